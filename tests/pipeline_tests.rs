//! End-to-end tests of the library pipeline: tables are normalized and matched
//! without going through the command line.

use addr_match::matching::report::MatchTable;
use addr_match::parsing::table::parse_table_text;
use addr_match::{
    AbbreviationDictionary, AddressRole, DatasetSpec, JoinIndicator, KeepSide, MatchConfig,
    MatchEngine, MatchField, NormalizedSet, RecordNormalizer,
};

fn spec(keep: &[&str], columns: &[&str], roles: &[AddressRole]) -> DatasetSpec {
    DatasetSpec {
        keep_columns: keep.iter().map(|s| s.to_string()).collect(),
        address_columns: columns.iter().map(|s| s.to_string()).collect(),
        address_roles: roles.to_vec(),
    }
}

fn normalize(dictionary: &AbbreviationDictionary, csv: &str, spec: &DatasetSpec) -> NormalizedSet {
    let table = parse_table_text(csv, b',').unwrap();
    RecordNormalizer::new(dictionary).normalize(&table, spec).unwrap()
}

fn field_spec() -> DatasetSpec {
    use MatchField::*;
    spec(
        &["id"],
        &["zip", "street", "number", "name"],
        &[
            AddressRole::Field(Zip),
            AddressRole::Field(StreetName),
            AddressRole::Field(StreetNumber),
            AddressRole::Field(Name),
        ],
    )
}

fn name_config() -> MatchConfig {
    let mut config = MatchConfig::new(vec![
        MatchField::Zip,
        MatchField::StreetName,
        MatchField::StreetNumber,
    ]);
    config.soft_keys = vec![MatchField::Name];
    config.check_name = true;
    config.jaro_threshold = 0.9;
    config
}

#[test]
fn test_ambiguous_group_keeps_only_the_similar_name() {
    let dictionary = AbbreviationDictionary::load_embedded().unwrap();
    let first = normalize(
        &dictionary,
        "id,zip,street,number,name\nA,90210,Main,100,Acme Cafe\n",
        &field_spec(),
    );
    let second = normalize(
        &dictionary,
        "id,zip,street,number,name\nB1,90210,Main,100,Acme Cafe\nB2,90210,Main,100,Beta Shop\n",
        &field_spec(),
    );

    let output = MatchEngine::new(name_config())
        .unwrap()
        .run(&first, &second)
        .unwrap();

    assert_eq!(output.summary.joined_rows, 2);
    assert_eq!(output.summary.ambiguous_groups, 1);
    assert_eq!(output.pairs.len(), 1);
    assert_eq!(output.pairs[0].right, Some(0));
    assert!(!output.pairs[0].check);
}

#[test]
fn test_default_threshold_never_confirms_names() {
    let dictionary = AbbreviationDictionary::load_embedded().unwrap();
    let csv = "id,zip,street,number,name\nA,90210,Main,100,Acme\nB,90210,Main,100,Acme\n";
    let first = normalize(&dictionary, csv, &field_spec());
    let second = normalize(&dictionary, csv, &field_spec());

    let mut config = name_config();
    config.jaro_threshold = 1.0;
    let output = MatchEngine::new(config).unwrap().run(&first, &second).unwrap();

    // Four joined rows in one ambiguous group; identical names still fail a 1.0 threshold
    assert_eq!(output.summary.joined_rows, 4);
    assert!(output.pairs.is_empty());
}

#[test]
fn test_outer_join_misses_never_appear() {
    let dictionary = AbbreviationDictionary::load_embedded().unwrap();
    let first = normalize(
        &dictionary,
        "id,zip,street,number,name\nA1,11111,Oak,1,Acme\nA2,22222,Elm,2,Acme\n",
        &field_spec(),
    );
    let second = normalize(
        &dictionary,
        "id,zip,street,number,name\nB1,11111,Oak,1,Other\nB2,33333,Pine,3,Acme\n",
        &field_spec(),
    );

    for keep in [KeepSide::Left, KeepSide::Right, KeepSide::Both] {
        for check_name in [true, false] {
            let mut config = name_config();
            config.keep = keep;
            config.check_name = check_name;
            config.jaro_threshold = 0.0;
            let output = MatchEngine::new(config).unwrap().run(&first, &second).unwrap();

            assert!(output.summary.joined_rows >= 2, "{keep:?} {check_name}");
            assert!(
                output.pairs.iter().all(|p| p.indicator == JoinIndicator::Both),
                "{keep:?} {check_name}"
            );
        }
    }
}

fn line_spec() -> DatasetSpec {
    spec(
        &["id"],
        &["address", "zip"],
        &[AddressRole::Address, AddressRole::Field(MatchField::Zip)],
    )
}

fn unit_config() -> MatchConfig {
    let mut config = MatchConfig::new(vec![
        MatchField::Zip,
        MatchField::StreetName,
        MatchField::StreetNumber,
    ]);
    config.soft_keys = vec![MatchField::UnitNumber];
    config
}

#[test]
fn test_missing_unit_disagrees_with_apartment() {
    let dictionary = AbbreviationDictionary::load_embedded().unwrap();
    let first = normalize(&dictionary, "id,address,zip
A,100 Main St,90210
", &line_spec());
    let second = normalize(
        &dictionary,
        "id,address,zip
B,100 Main St Apt 4B,90210
",
        &line_spec(),
    );
    assert_eq!(first.records[0].get(MatchField::UnitNumber), Some(""));
    assert_eq!(second.records[0].get(MatchField::UnitNumber), Some("4B"));

    let output = MatchEngine::new(unit_config()).unwrap().run(&first, &second).unwrap();
    assert_eq!(output.pairs.len(), 1);
    assert!(output.pairs[0].check);
    assert_eq!(output.summary.flagged, 1);
}

#[test]
fn test_ambiguous_group_promoted_by_matching_empty_units() {
    let dictionary = AbbreviationDictionary::load_embedded().unwrap();
    let first = normalize(&dictionary, "id,address,zip
A,100 Main St,90210
", &line_spec());
    let second = normalize(
        &dictionary,
        "id,address,zip
B1,100 Main St,90210
B2,100 Main St,90210
B3,100 Main St Apt 2,90210
",
        &line_spec(),
    );

    let output = MatchEngine::new(unit_config()).unwrap().run(&first, &second).unwrap();
    assert_eq!(output.summary.ambiguous_groups, 1);
    assert_eq!(output.summary.joined_rows, 3);
    let rights: Vec<_> = output.pairs.iter().map(|p| p.right).collect();
    assert_eq!(rights, vec![Some(0), Some(1)]);
    assert!(output.pairs.iter().all(|p| !p.check));
}

#[test]
fn test_two_line_and_single_line_sources_match() {
    let dictionary = AbbreviationDictionary::load_embedded().unwrap();
    let first = normalize(
        &dictionary,
        "\
biz,address1,address2,zip_code,name
Y1,123 North Main Street,Suite 200,92618-0001,Acme Cafe
Y2,9 Oak Avenue,,92618,Zed Books
",
        &spec(
            &["biz"],
            &["address1", "address2", "zip_code", "name"],
            &[
                AddressRole::Address1,
                AddressRole::Address2,
                AddressRole::Field(MatchField::Zip),
                AddressRole::Field(MatchField::Name),
            ],
        ),
    );
    let second = normalize(
        &dictionary,
        "\
ACCT,ADDRESS,POSTAL,CUST
A1,123 Main St Ste 210,92618,ACME CAFE LLC
A2,9 Oak Ave,92618,ZED BOOKS
",
        &spec(
            &["ACCT"],
            &["ADDRESS", "POSTAL", "CUST"],
            &[
                AddressRole::Address,
                AddressRole::Field(MatchField::Zip),
                AddressRole::Field(MatchField::Name),
            ],
        ),
    );

    let mut config = name_config();
    config.soft_keys = vec![MatchField::UnitNumber, MatchField::Name];
    let engine = MatchEngine::new(config).unwrap();
    let output = engine.run(&first, &second).unwrap();

    assert_eq!(output.pairs.len(), 2);
    // Unit 200 vs 210 disagrees, so the first pair is flagged
    assert!(output.pairs[0].check);
    assert!(!output.pairs[1].check);

    let table = MatchTable::build(&first, &second, &engine.config().hard_keys, &output);
    let acct = table.headers.iter().position(|h| h == "ACCT").unwrap();
    let unit_x = table.headers.iter().position(|h| h == "unitNumber_x").unwrap();
    let unit_y = table.headers.iter().position(|h| h == "unitNumber_y").unwrap();
    assert_eq!(table.rows[0][acct], "A1");
    assert_eq!(table.rows[0][unit_x], "200");
    assert_eq!(table.rows[0][unit_y], "210");
    assert_eq!(table.rows[1][acct], "A2");
}

#[test]
fn test_keep_side_controls_unmatched_rows() {
    let dictionary = AbbreviationDictionary::load_embedded().unwrap();
    let first = normalize(
        &dictionary,
        "id,zip,street,number,name\nA1,11111,Oak,1,Acme\nA2,22222,Elm,2,Acme\n",
        &field_spec(),
    );
    let second = normalize(
        &dictionary,
        "id,zip,street,number,name\nB1,11111,Oak,1,Acme\nB2,33333,Pine,3,Acme\n",
        &field_spec(),
    );

    let summary_for = |keep| {
        let mut config = name_config();
        config.keep = keep;
        MatchEngine::new(config)
            .unwrap()
            .run(&first, &second)
            .unwrap()
            .summary
    };

    let left = summary_for(KeepSide::Left);
    assert_eq!((left.left_only, left.right_only, left.both), (1, 0, 1));

    let right = summary_for(KeepSide::Right);
    assert_eq!((right.left_only, right.right_only, right.both), (0, 1, 1));

    let both = summary_for(KeepSide::Both);
    assert_eq!((both.left_only, both.right_only, both.both), (1, 1, 1));
    assert_eq!(both.matched, 1);
}
