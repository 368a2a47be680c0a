use std::path::Path;

fn main() {
    validate_table(
        Path::new("catalogs/street_suffixes.csv"),
        &["long", "medium", "abbrev"],
    );
    validate_table(
        Path::new("catalogs/unit_designators.csv"),
        &["long", "abbrev"],
    );
    set_build_dependencies();
}

fn validate_table(table_path: &Path, expected_headers: &[&str]) {
    // Ensure table exists at build time
    assert!(
        table_path.exists(),
        "\n\nDICTIONARY BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the abbreviation table before building.\n",
        table_path.display()
    );

    let mut reader = csv::Reader::from_path(table_path).unwrap_or_else(|e| {
        panic!(
            "\n\nDICTIONARY BUILD ERROR: Failed to open file\n\
             Path: {}\n\
             Error: {e}\n",
            table_path.display()
        );
    });

    let headers = reader.headers().cloned().unwrap_or_else(|e| {
        panic!(
            "\n\nDICTIONARY BUILD ERROR: Failed to read header row\n\
             Path: {}\n\
             Error: {e}\n",
            table_path.display()
        );
    });

    let actual: Vec<&str> = headers.iter().collect();
    assert!(
        actual == expected_headers,
        "\n\nDICTIONARY BUILD ERROR: Unexpected header row\n\
         Path: {}\n\
         Expected: {expected_headers:?}\n\
         Got: {actual:?}\n",
        table_path.display()
    );

    let rows = validate_rows(&mut reader, table_path);

    println!(
        "cargo:warning=Validated {}: {rows} entries",
        table_path.display()
    );
}

fn validate_rows(reader: &mut csv::Reader<std::fs::File>, table_path: &Path) -> usize {
    let mut rows = 0;

    for (i, record) in reader.records().enumerate() {
        // Line numbers are 1-based and skip the header
        let line = i + 2;
        let record = record.unwrap_or_else(|e| {
            panic!(
                "\n\nDICTIONARY BUILD ERROR: Malformed row\n\
                 Path: {}, line {line}\n\
                 Error: {e}\n",
                table_path.display()
            );
        });

        for value in &record {
            assert!(
                !value.is_empty()
                    && value
                        .chars()
                        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '#'),
                "\n\nDICTIONARY BUILD ERROR: Invalid entry '{value}'\n\
                 Path: {}, line {line}\n\
                 Entries must be non-empty and use only A-Z, 0-9 and '#'.\n",
                table_path.display()
            );
        }

        rows += 1;
    }

    assert!(
        rows > 0,
        "\n\nDICTIONARY BUILD ERROR: Table has no entries\n\
         Path: {}\n",
        table_path.display()
    );

    rows
}

fn set_build_dependencies() {
    // Tell cargo to rerun if the tables change
    println!("cargo:rerun-if-changed=catalogs/street_suffixes.csv");
    println!("cargo:rerun-if-changed=catalogs/unit_designators.csv");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
