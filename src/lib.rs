/*!
# SKU Sheet

The SKU derivation and reactivity engine behind a browser-based product
catalog spreadsheet.

## Overview

Users describe a product line with *specifications* (Color, Size, ...), each
holding an ordered list of *values* that pair a label shown in the grid
("Red") with a short SKU *fragment* ("R"). Every data row of a sheet has one
`spec` column per specification and a SKU column whose content is derived
from the row's selections:

```text
prefix + join(non-empty fragments in specification order, delimiter) + suffix
```

The engine keeps that SKU column in sync whenever specifications, values,
their order or their fragments change, and can auto-populate a sheet with
every combination of specification values.

## Architecture

Everything is synchronous and in-memory. The UI layer owns rendering,
persistence and undo; it calls into the engine at each mutation site.

- **SKU Composer** (`composer`) - pure `compose_sku(fragments, settings)`
- **Row SKU Updater** (`updater`) - resolves a row's selections to fragments
  and rewrites its SKU cell
- **Change Detector** (`changes`) - diffs two specification snapshots by id
  into fragment/order flags and display-value renames
- **Bulk Regenerator** (`regenerate`) - applies renames to the grid first,
  then re-derives every SKU, publishing the new rows in one assignment
- **Combination Generator** (`combinations`) - mixed-radix cartesian product
  in a user-chosen nesting order

Supporting modules:

- **cell**, **column**: the grid contracts the engine consumes
- **specification**: per-sheet specification store enforcing dense `order`
  and per-specification fragment uniqueness
- **spreadsheet**: `Sheet`, wiring store edits to detection and regeneration
- **settings**: delimiter/prefix/suffix, loadable from JSON
- **migration**: one-shot move from a workbook-wide specification set to
  per-sheet specifications
- **error**: store rejections

## Error Handling

Derivation never fails: empty or unrecognised cell text contributes an empty
fragment, and generation with an empty specification yields no rows. The
store rejects duplicate fragments, empty or duplicate specification names and
empty labels with [`SpecError`], leaving its state unchanged.
*/

pub mod cell;
pub mod changes;
pub mod column;
pub mod combinations;
pub mod composer;
pub mod error;
pub mod migration;
pub mod regenerate;
pub mod settings;
pub mod specification;
pub mod spreadsheet;
pub mod updater;

/// Re-export everything from these modules to make it easier to use
pub use cell::*;
pub use changes::*;
pub use column::*;
pub use combinations::*;
pub use composer::*;
pub use error::*;
pub use migration::*;
pub use regenerate::*;
pub use settings::*;
pub use specification::*;
pub use spreadsheet::*;
pub use updater::*;
