use skusheet::{
    Cell, Column, GenerationOrder, InsertMode, Sheet, SkuSettings, Specification,
    SpecificationStore, ValueUpdate, compose_sku, detect_changes, generate_combinations,
    regenerate, regenerate_skus,
};

// Helper function to build a Color/Size sheet with one selected row
fn shirt_sheet(settings: &SkuSettings) -> Sheet {
    let mut sheet = Sheet::create("Shirts");
    let color = sheet.add_specification("Color", settings).unwrap();
    let size = sheet.add_specification("Size", settings).unwrap();
    sheet.add_value(color, "Red", "R", settings).unwrap();
    sheet.add_value(color, "Blue", "B", settings).unwrap();
    sheet.add_value(size, "Small", "S", settings).unwrap();
    sheet.add_value(size, "Medium", "M", settings).unwrap();
    sheet.set_cell(0, 1, "Red", settings);
    sheet.set_cell(0, 2, "Small", settings);
    sheet
}

fn test_compose_sku() {
    println!("\n====== Testing compose_sku ======");
    let settings = SkuSettings::default();

    assert_eq!(compose_sku(&["R", "", "S"], &settings), "R-S");
    println!("✓ Empty middle fragment skipped: R-S");

    let wrapped = SkuSettings::new("-", "SKU-", "-V1");
    assert_eq!(compose_sku(&["R", "S"], &wrapped), "SKU-R-S-V1");
    println!("✓ Prefix and suffix wrap the joined fragments: SKU-R-S-V1");

    assert_eq!(
        compose_sku(&["R", "S"], &wrapped),
        compose_sku(&["R", "S"], &wrapped)
    );
    println!("✓ Composition is deterministic");
}

fn test_fragment_scope() {
    println!("\n====== Testing fragment uniqueness ======");
    let mut store = SpecificationStore::new();
    let a = store.add_specification("Color").unwrap();
    let b = store.add_specification("Material").unwrap();
    store.add_value(b, "Rubber", "R").unwrap();

    assert!(store.add_value(a, "Red", "R").is_ok());
    println!("✓ Fragment R accepted in Color although Material uses it");

    assert!(store.add_value(a, "Rose", "R").is_err());
    println!("✓ Second R in Color rejected");
}

fn test_order_repacking() {
    println!("\n====== Testing order re-packing ======");
    let mut store = SpecificationStore::new();
    store.add_specification("Color").unwrap();
    let size = store.add_specification("Size").unwrap();
    store.add_specification("Material").unwrap();

    store.remove_specification(size).unwrap();
    let orders: Vec<(String, usize)> = store.iter().map(|s| (s.name.clone(), s.order)).collect();
    assert_eq!(
        orders,
        vec![("Color".to_string(), 0), ("Material".to_string(), 1)]
    );
    println!("✓ Removing Size leaves Color:0, Material:1");
}

fn test_change_detection() {
    println!("\n====== Testing detect_changes ======");
    let prev = vec![Specification::new("Color", 0).with_value("Red", "R")];

    let mut renamed = prev.clone();
    renamed[0].values[0].display_value = "Crimson".to_string();
    let changes = detect_changes(&prev, &renamed);
    assert!(!changes.fragment_changed);
    assert_eq!(changes.display_value_changes.len(), 1);
    println!("✓ Rename only: display change recorded, fragment flag clear");

    let mut refragmented = prev.clone();
    refragmented[0].values[0].sku_fragment = "RD".to_string();
    let changes = detect_changes(&prev, &refragmented);
    assert!(changes.fragment_changed);
    assert!(changes.display_value_changes.is_empty());
    println!("✓ Fragment only: fragment flag set, no display change");
}

fn test_regeneration_ordering() {
    println!("\n====== Testing regenerate ordering ======");
    let settings = SkuSettings::default();
    let mut sheet = shirt_sheet(&settings);
    assert_eq!(sheet.sku(0), "R-S");

    let color = sheet.specifications.get_by_name("Color").unwrap().id;
    let red = sheet.specifications.get(color).unwrap().value_by_display("Red").unwrap().id;
    sheet
        .update_value(color, red, ValueUpdate::both("Crimson", "CR"), &settings)
        .unwrap();

    assert_eq!(sheet.cell_text(0, 1), "Crimson");
    assert_eq!(sheet.sku(0), "CR-S");
    println!("✓ Rename and fragment edit together: Crimson / CR-S");

    let before = sheet.rows.clone();
    regenerate_skus(&mut sheet, &settings);
    regenerate(&mut sheet, &settings, &Default::default());
    assert_eq!(sheet.rows, before);
    println!("✓ Regeneration is idempotent");
}

fn test_combinations() {
    println!("\n====== Testing generate_combinations ======");
    let color = Specification::new("Color", 0)
        .with_value("Red", "R")
        .with_value("Blue", "B");
    let size = Specification::new("Size", 1)
        .with_value("S", "S")
        .with_value("M", "M")
        .with_value("L", "L");
    let columns = vec![Column::spec("Color", color.id), Column::spec("Size", size.id)];

    let rows = generate_combinations(&[(&color, 0), (&size, 1)], &columns);
    let seen: Vec<String> = rows
        .iter()
        .map(|r| format!("{}/{}", r[0].value, r[1].value))
        .collect();
    assert_eq!(
        seen,
        vec!["Red/S", "Red/M", "Red/L", "Blue/S", "Blue/M", "Blue/L"]
    );
    println!("✓ 6 rows, Color slowest, Size fastest");

    let empty = Specification::new("Fit", 2);
    assert!(generate_combinations(&[(&color, 0), (&empty, 1)], &columns).is_empty());
    println!("✓ Zero-value specification short-circuits to no rows");
}

fn test_auto_populate() {
    println!("\n====== Testing auto_populate ======");
    let settings = SkuSettings::default();
    let mut sheet = shirt_sheet(&settings);
    let order = GenerationOrder::from_specifications(sheet.specifications.as_slice());

    let inserted = sheet.auto_populate(&order, InsertMode::Replace, &settings);
    assert_eq!(inserted, 4);
    let skus: Vec<&str> = (0..sheet.rows.len()).map(|r| sheet.sku(r)).collect();
    assert_eq!(skus, vec!["R-S", "R-M", "B-S", "B-M"]);
    println!("✓ Replace mode filled 4 rows with SKUs {:?}", skus);

    sheet.insert_rows(vec![vec![Cell::empty(); 3]], InsertMode::Append);
    assert_eq!(sheet.rows.len(), 5);
    println!("✓ Append mode keeps existing rows");
}

pub fn run_tests() {
    println!("Starting SKU engine checks");
    test_compose_sku();
    test_fragment_scope();
    test_order_repacking();
    test_change_detection();
    test_regeneration_ordering();
    test_combinations();
    test_auto_populate();
    println!("All tests passed!");
}

fn main() {
    run_tests();
}
