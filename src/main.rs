#![cfg(not(tarpaulin_include))]

use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use skusheet::{
    GenerationOrder, InsertMode, Sheet, SkuSettings, SpecError, SpecId, ValueId, ValueUpdate,
    combination_count, regenerate_skus,
};
use std::env;
use std::io::{self, Write};
use std::time::Instant;

lazy_static! {
    // A token is either a double-quoted string (possibly empty) or a run of non-space characters.
    static ref TOKEN_REGEX: Regex = Regex::new(r#""([^"]*)"|(\S+)"#).unwrap();
}

fn tokenize(line: &str) -> Vec<String> {
    TOKEN_REGEX
        .captures_iter(line)
        .map(|c| {
            c.get(1)
                .or_else(|| c.get(2))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        })
        .collect()
}

fn find_spec(sheet: &Sheet, name: &str) -> Result<SpecId, String> {
    sheet
        .specifications
        .get_by_name(name)
        .map(|s| s.id)
        .ok_or_else(|| format!("no specification '{}'", name))
}

fn find_value(sheet: &Sheet, spec_id: SpecId, label: &str) -> Result<ValueId, String> {
    sheet
        .specifications
        .get(spec_id)
        .and_then(|s| s.value_by_display(label))
        .map(|v| v.id)
        .ok_or_else(|| format!("no value '{}'", label))
}

fn display(sheet: &Sheet) {
    let widths: Vec<usize> = (0..sheet.width())
        .map(|c| {
            let cells = sheet.rows.iter().map(|r| r.get(c).map_or(0, |x| x.text().len()));
            cells
                .chain(std::iter::once(sheet.columns[c].title.len()))
                .max()
                .unwrap_or(0)
                .max(3)
        })
        .collect();

    print!("{:>4} ", "");
    for (c, w) in widths.iter().enumerate() {
        print!("{:<w$} ", Sheet::col_to_letter(c), w = w);
    }
    println!();
    print!("{:>4} ", "");
    for (column, w) in sheet.columns.iter().zip(&widths) {
        print!("{:<w$} ", column.title, w = w);
    }
    println!();
    for (r, _) in sheet.rows.iter().enumerate() {
        print!("{:>4} ", r + 1);
        for (c, w) in widths.iter().enumerate() {
            print!("{:<w$} ", sheet.cell_text(r, c), w = w);
        }
        println!();
    }
}

fn print_help() {
    println!("Commands:");
    println!("  spec <name>                         Add a specification");
    println!("  rename <spec> <name>                Rename a specification");
    println!("  drop <spec>                         Remove a specification");
    println!("  move <spec> <order>                 Move a specification in SKU order");
    println!("  value <spec> <label> <fragment>     Add a value (use \"\" for no fragment)");
    println!("  edit <spec> <label> <label> <frag>  Change a value's label and fragment");
    println!("  unvalue <spec> <label>              Remove a value");
    println!("  set <row> <spec> <label>            Select a value in a data row");
    println!("  fill | append                       Auto-populate every combination");
    println!("  delim|prefix|suffix <text>          Change SKU formatting");
    println!("  show                                Print the sheet");
    println!("  q                                   Quit");
}

fn spec_err(e: SpecError) -> String {
    e.to_string()
}

fn nth(args: &[String], i: usize) -> Result<&str, String> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| "missing argument".to_string())
}

fn execute(sheet: &mut Sheet, settings: &mut SkuSettings, args: &[String]) -> Result<(), String> {
    let arg = |i: usize| nth(args, i);

    match arg(0)? {
        "spec" => {
            sheet.add_specification(arg(1)?, settings).map_err(spec_err)?;
        }
        "rename" => {
            let id = find_spec(sheet, arg(1)?)?;
            sheet.rename_specification(id, arg(2)?).map_err(spec_err)?;
        }
        "drop" => {
            let id = find_spec(sheet, arg(1)?)?;
            sheet.remove_specification(id, settings).map_err(spec_err)?;
        }
        "move" => {
            let id = find_spec(sheet, arg(1)?)?;
            let order: usize = arg(2)?.parse().map_err(|_| "invalid order".to_string())?;
            sheet
                .reorder_specification(id, order, settings)
                .map_err(spec_err)?;
        }
        "value" => {
            let id = find_spec(sheet, arg(1)?)?;
            sheet
                .add_value(id, arg(2)?, arg(3)?, settings)
                .map_err(spec_err)?;
        }
        "edit" => {
            let spec_id = find_spec(sheet, arg(1)?)?;
            let value_id = find_value(sheet, spec_id, arg(2)?)?;
            let changes = sheet
                .update_value(spec_id, value_id, ValueUpdate::both(arg(3)?, arg(4)?), settings)
                .map_err(spec_err)?;
            info!(
                "edit: fragment changed {}, {} renames",
                changes.fragment_changed,
                changes.display_value_changes.len()
            );
        }
        "unvalue" => {
            let spec_id = find_spec(sheet, arg(1)?)?;
            let value_id = find_value(sheet, spec_id, arg(2)?)?;
            sheet
                .remove_value(spec_id, value_id, settings)
                .map_err(spec_err)?;
        }
        "set" => {
            let row: usize = arg(1)?.parse().map_err(|_| "invalid row".to_string())?;
            if row == 0 {
                return Err("rows start at 1".to_string());
            }
            let spec_id = find_spec(sheet, arg(2)?)?;
            let col = sheet
                .spec_column(spec_id)
                .ok_or_else(|| "specification has no column".to_string())?;
            sheet.set_cell(row - 1, col, arg(3)?, settings);
        }
        "fill" | "append" => {
            let order = GenerationOrder::from_specifications(sheet.specifications.as_slice());
            let planned: Vec<_> = order.resolve(sheet.specifications.as_slice());
            let specs: Vec<_> = planned.iter().map(|(s, _)| *s).collect();
            if combination_count(&specs) == 0 {
                return Err("nothing to generate".to_string());
            }
            let mode = if args[0] == "fill" {
                InsertMode::Replace
            } else {
                InsertMode::Append
            };
            sheet.auto_populate(&order, mode, settings);
        }
        "delim" | "prefix" | "suffix" => {
            let text = args.get(1).cloned().unwrap_or_default();
            match args[0].as_str() {
                "delim" => settings.delimiter = text,
                "prefix" => settings.prefix = text,
                _ => settings.suffix = text,
            }
            regenerate_skus(sheet, settings);
        }
        "show" => {}
        _ => return Err("invalid command".to_string()),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    let mut settings = match args.get(1) {
        Some(path) => SkuSettings::load(path)?,
        None => SkuSettings::default(),
    };
    info!("using settings {:?}", settings);

    let mut sheet = Sheet::create("Catalog");
    let mut start_time = Instant::now();
    let mut status = String::from("ok");
    let mut show = true;

    loop {
        if show {
            display(&sheet);
        }

        let elapsed_time = start_time.elapsed().as_secs_f64();
        print!("[{:.1}] ({}) > ", elapsed_time, status);
        io::stdout().flush()?;

        let mut command = String::new();
        if io::stdin().read_line(&mut command)? == 0 {
            break;
        }
        let command = command.trim();
        start_time = Instant::now();

        if command.is_empty() {
            status = String::from("invalid command");
            show = false;
            continue;
        }
        if command == "q" {
            break;
        }
        if command == "help" {
            print_help();
            show = false;
            continue;
        }

        match execute(&mut sheet, &mut settings, &tokenize(command)) {
            Ok(()) => {
                status = String::from("ok");
                show = true;
            }
            Err(e) => {
                warn!("{}: {}", command, e);
                status = e;
                show = false;
            }
        }
    }

    Ok(())
}
