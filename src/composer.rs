use crate::settings::SkuSettings;

/// Compose a SKU string from ordered fragments.
///
/// Produces `prefix + join(non-empty fragments, delimiter) + suffix`.
/// Empty fragments are dropped before joining, so they never introduce
/// doubled, leading or trailing delimiters. With no non-empty fragment the
/// result is just `prefix + suffix`.
///
/// # Arguments
/// * `fragments` - Fragments already sorted by specification order
/// * `settings` - Delimiter, prefix and suffix
///
/// # Returns
/// * `String` - The composed SKU
///
/// # Examples
/// ```
/// use skusheet::composer::compose_sku;
/// use skusheet::settings::SkuSettings;
///
/// let settings = SkuSettings::new("-", "SKU-", "-V1");
/// assert_eq!(compose_sku(&["R", "S"], &settings), "SKU-R-S-V1");
/// assert_eq!(compose_sku(&["R", "", "S"], &SkuSettings::default()), "R-S");
/// ```
pub fn compose_sku<S: AsRef<str>>(fragments: &[S], settings: &SkuSettings) -> String {
    let mut sku = String::with_capacity(
        settings.prefix.len()
            + settings.suffix.len()
            + fragments
                .iter()
                .map(|f| f.as_ref().len() + settings.delimiter.len())
                .sum::<usize>(),
    );

    sku.push_str(&settings.prefix);
    let mut first = true;
    for fragment in fragments.iter().map(AsRef::as_ref) {
        if fragment.is_empty() {
            continue;
        }
        if !first {
            sku.push_str(&settings.delimiter);
        }
        sku.push_str(fragment);
        first = false;
    }
    sku.push_str(&settings.suffix);
    sku
}
