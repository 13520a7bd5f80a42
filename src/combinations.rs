use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Row, blank_row};
use crate::column::{Column, spec_column_indices};
use crate::specification::{SpecId, Specification};

/// The order in which specifications are nested when auto-populating.
///
/// Position 0 varies slowest, the last position varies fastest. This is set
/// by the user independently of each specification's SKU `order`.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct GenerationOrder {
    spec_ids: Vec<SpecId>,
}

impl GenerationOrder {
    pub fn new(spec_ids: Vec<SpecId>) -> Self {
        GenerationOrder { spec_ids }
    }

    /// Default plan: every specification, nested by its SKU `order`.
    pub fn from_specifications(specs: &[Specification]) -> Self {
        let mut sorted: Vec<&Specification> = specs.iter().collect();
        sorted.sort_by_key(|s| s.order);
        GenerationOrder {
            spec_ids: sorted.into_iter().map(|s| s.id).collect(),
        }
    }

    pub fn spec_ids(&self) -> &[SpecId] {
        &self.spec_ids
    }

    pub fn is_empty(&self) -> bool {
        self.spec_ids.is_empty()
    }

    /// Move `id` to `target` (clamped). Unknown ids are ignored.
    pub fn move_to(&mut self, id: SpecId, target: usize) {
        let Some(index) = self.spec_ids.iter().position(|s| *s == id) else {
            return;
        };
        let id = self.spec_ids.remove(index);
        let target = target.min(self.spec_ids.len());
        self.spec_ids.insert(target, id);
    }

    /// Drop `id` from the plan, leaving that specification's cells empty.
    pub fn exclude(&mut self, id: SpecId) {
        self.spec_ids.retain(|s| *s != id);
    }

    /// Pair each planned specification with its generation position.
    /// Ids no longer present in `specs` are skipped.
    pub fn resolve<'a>(&self, specs: &'a [Specification]) -> Vec<(&'a Specification, usize)> {
        self.spec_ids
            .iter()
            .filter_map(|id| specs.iter().find(|s| s.id == *id))
            .enumerate()
            .map(|(position, spec)| (spec, position))
            .collect()
    }
}

/// Number of rows auto-populating `specs` would produce.
///
/// Zero when the list is empty, when any specification has no values, or
/// when the product does not fit in `usize`.
pub fn combination_count(specs: &[&Specification]) -> usize {
    if specs.is_empty() {
        return 0;
    }
    specs
        .iter()
        .try_fold(1usize, |acc, spec| acc.checked_mul(spec.values.len()))
        .unwrap_or(0)
}

/// Build the cartesian product of the specifications' values as rows.
///
/// `ordered` pairs each specification with its generation position; the
/// pairs are sorted by position, then treated as a mixed-radix counter whose
/// least-significant digit is the last position. Row `i` therefore holds, for
/// each specification, value `(i / divisor) % len` where `divisor` is the
/// product of the value counts of every later-positioned specification.
///
/// Each value is written into every column bound to its specification;
/// all other cells are empty. SKUs are not filled in.
///
/// # Arguments
/// * `ordered` - `(specification, generation position)` pairs
/// * `columns` - Full column layout of the target sheet
///
/// # Returns
/// * `Vec<Row>` - `N` rows of `columns.len()` cells, or nothing if any
///   specification has zero values
///
/// # Examples
/// ```
/// use skusheet::column::Column;
/// use skusheet::combinations::generate_combinations;
/// use skusheet::specification::Specification;
///
/// let color = Specification::new("Color", 0).with_value("Red", "R").with_value("Blue", "B");
/// let size = Specification::new("Size", 1).with_value("S", "S").with_value("M", "M");
/// let columns = vec![Column::spec("Color", color.id), Column::spec("Size", size.id)];
///
/// let rows = generate_combinations(&[(&color, 0), (&size, 1)], &columns);
/// let labels: Vec<String> = rows
///     .iter()
///     .map(|r| format!("{}/{}", r[0].value, r[1].value))
///     .collect();
/// assert_eq!(labels, ["Red/S", "Red/M", "Blue/S", "Blue/M"]);
/// ```
pub fn generate_combinations(
    ordered: &[(&Specification, usize)],
    columns: &[Column],
) -> Vec<Row> {
    let mut plan: Vec<(&Specification, usize)> = ordered.to_vec();
    plan.sort_by_key(|(_, position)| *position);
    let specs: Vec<&Specification> = plan.iter().map(|(spec, _)| *spec).collect();

    if specs.is_empty() || specs.iter().any(|s| s.values.is_empty()) {
        return Vec::new();
    }
    let total = combination_count(&specs);
    if total == 0 {
        warn!("combination count overflows usize; nothing generated");
        return Vec::new();
    }

    let targets: Vec<Vec<usize>> = specs
        .iter()
        .map(|spec| spec_column_indices(columns, spec.id))
        .collect();

    let mut rows = Vec::with_capacity(total);
    for i in 0..total {
        let mut row = blank_row(columns.len());
        let mut divisor = 1usize;
        for (spec, target) in specs.iter().zip(&targets).rev() {
            let len = spec.values.len();
            let value = &spec.values[(i / divisor) % len];
            for &index in target {
                row[index] = Cell::create(&value.display_value);
            }
            divisor *= len;
        }
        rows.push(row);
    }

    debug!(
        "generated {} combinations across {} specifications",
        rows.len(),
        specs.len()
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(rows: &[Row], columns: &[usize]) -> Vec<String> {
        rows.iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|&c| r[c].value.as_str())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .collect()
    }

    #[test]
    fn first_position_varies_slowest() {
        let color = Specification::new("Color", 0)
            .with_value("Red", "R")
            .with_value("Blue", "B");
        let size = Specification::new("Size", 1)
            .with_value("S", "S")
            .with_value("M", "M")
            .with_value("L", "L");
        let columns = vec![
            Column::sku("SKU"),
            Column::spec("Color", color.id),
            Column::spec("Size", size.id),
        ];

        let rows = generate_combinations(&[(&color, 0), (&size, 1)], &columns);

        assert_eq!(
            labels(&rows, &[1, 2]),
            vec!["Red/S", "Red/M", "Red/L", "Blue/S", "Blue/M", "Blue/L"]
        );
        assert!(rows.iter().all(|r| r.len() == 3 && r[0].value.is_empty()));
    }

    #[test]
    fn generation_position_overrides_sku_order() {
        let color = Specification::new("Color", 0)
            .with_value("Red", "R")
            .with_value("Blue", "B");
        let size = Specification::new("Size", 1)
            .with_value("S", "S")
            .with_value("M", "M");
        let columns = vec![Column::spec("Color", color.id), Column::spec("Size", size.id)];

        let rows = generate_combinations(&[(&color, 1), (&size, 0)], &columns);

        assert_eq!(
            labels(&rows, &[0, 1]),
            vec!["Red/S", "Blue/S", "Red/M", "Blue/M"]
        );
    }

    #[test]
    fn any_empty_specification_yields_nothing() {
        let color = Specification::new("Color", 0).with_value("Red", "R");
        let size = Specification::new("Size", 1);
        let columns = vec![Column::spec("Color", color.id), Column::spec("Size", size.id)];

        assert!(generate_combinations(&[(&color, 0), (&size, 1)], &columns).is_empty());
        assert!(generate_combinations(&[], &columns).is_empty());
        assert_eq!(combination_count(&[&color, &size]), 0);
        assert_eq!(combination_count(&[]), 0);
    }

    #[test]
    fn three_level_mixed_radix() {
        let a = Specification::new("A", 0).with_value("a1", "").with_value("a2", "");
        let b = Specification::new("B", 1).with_value("b1", "");
        let c = Specification::new("C", 2).with_value("c1", "").with_value("c2", "");
        let columns = vec![
            Column::spec("A", a.id),
            Column::spec("B", b.id),
            Column::spec("C", c.id),
        ];

        let rows = generate_combinations(&[(&c, 2), (&a, 0), (&b, 1)], &columns);

        assert_eq!(
            labels(&rows, &[0, 1, 2]),
            vec!["a1/b1/c1", "a1/b1/c2", "a2/b1/c1", "a2/b1/c2"]
        );
    }

    #[test]
    fn output_is_deterministic() {
        let color = Specification::new("Color", 0)
            .with_value("Red", "R")
            .with_value("Blue", "B");
        let columns = vec![Column::spec("Color", color.id)];

        assert_eq!(
            generate_combinations(&[(&color, 0)], &columns),
            generate_combinations(&[(&color, 0)], &columns)
        );
    }

    #[test]
    fn generation_order_editing() {
        let specs = vec![
            Specification::new("Size", 1).with_value("S", "S"),
            Specification::new("Color", 0).with_value("Red", "R"),
        ];
        let mut order = GenerationOrder::from_specifications(&specs);
        assert_eq!(order.spec_ids(), &[specs[1].id, specs[0].id]);

        order.move_to(specs[0].id, 0);
        let resolved: Vec<(&str, usize)> = order
            .resolve(&specs)
            .into_iter()
            .map(|(s, p)| (s.name.as_str(), p))
            .collect();
        assert_eq!(resolved, vec![("Size", 0), ("Color", 1)]);

        order.exclude(specs[0].id);
        assert_eq!(order.spec_ids(), &[specs[1].id]);
    }

    #[test]
    fn stale_ids_are_skipped_when_resolving() {
        let color = Specification::new("Color", 0).with_value("Red", "R");
        let order = GenerationOrder::new(vec![uuid::Uuid::new_v4(), color.id]);

        let resolved = order.resolve(std::slice::from_ref(&color));
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].0.id, color.id);
        assert_eq!(resolved[0].1, 0);
    }
}
