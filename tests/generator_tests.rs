// tests/generator_tests.rs

use dsforge::{generate, DsError, Field, FieldTree, FieldType, FormatKey, Generator, Header, StructureKind};

fn numbered(fields: Vec<Field>) -> Vec<Field> {
    FieldTree::from_fields(fields).into_fields()
}

#[test]
fn test_golden_default_structure() {
    let header = Header::new("cust", StructureKind::Default).with_dimension("100");
    let fields = vec![Field::scalar("id", FieldType::Integer).with_length("10")];
    let text = generate(&header, &fields, FormatKey::Lower, "").unwrap();
    assert_eq!(
        text,
        "dcl-ds cust qualified dim(100);\n   id int(10);\nend-ds;"
    );
}

#[test]
fn test_template_never_carries_dimension() {
    let header = Header::new("tmpl", StructureKind::Template).with_dimension("5");
    let fields = vec![Field::scalar("flag", FieldType::Indicator)];
    let text = generate(&header, &fields, FormatKey::Lower, "").unwrap();
    assert_eq!(text, "dcl-ds tmpl qualified template;\n   flag ind;\nend-ds;");
}

#[test]
fn test_var_and_auto_length_clauses() {
    let fields = vec![Field::scalar("c", FieldType::Character).with_length("1")];

    let header = Header::new("buf", StructureKind::VarLength).with_dimension("50");
    let text = generate(&header, &fields, FormatKey::Lower, "").unwrap();
    assert!(text.starts_with("dcl-ds buf qualified dim(*var:50);"));

    let header = Header::new("buf", StructureKind::AutoLength).with_dimension("50");
    let text = generate(&header, &fields, FormatKey::Upper, "").unwrap();
    assert!(text.starts_with("DCL-DS buf QUALIFIED DIM(*AUTO:50);"));
}

#[test]
fn test_nested_aggregate_is_not_qualified() {
    let header = Header::new("order", StructureKind::Default);
    let fields = numbered(vec![
        Field::scalar("no", FieldType::PackedDecimal).with_length("7:0"),
        Field::aggregate(
            "line",
            vec![
                Field::scalar("item", FieldType::Character).with_length("15"),
                Field::scalar("qty", FieldType::ZonedDecimal)
                    .with_length("5:2")
                    .with_init("1.00"),
            ],
        )
        .with_length("20"),
    ]);
    let text = generate(&header, &fields, FormatKey::Lower, "").unwrap();
    let expected = "\
dcl-ds order qualified;
   no packed(7:0);
   dcl-ds line dim(20);
      item char(15);
      qty zoned(5:2) inz(1.00);
   end-ds;
end-ds;";
    assert_eq!(text, expected);
}

#[test]
fn test_title_case_field_options() {
    let header = Header::new("Rec", StructureKind::Default);
    let fields = numbered(vec![
        Field::scalar("Name", FieldType::VariableCharacter)
            .with_length("40")
            .with_init("'n/a'"),
        Field::scalar("Codes", FieldType::Unsigned)
            .with_length("3")
            .with_repeat(10),
        Field::scalar("Stamp", FieldType::Timestamp),
    ]);
    let text = generate(&header, &fields, FormatKey::Title, "").unwrap();
    let expected = "\
Dcl-Ds Rec Qualified;
   Name VarChar(40) Inz('n/a');
   Codes Uns(3) Dim(10);
   Stamp Timestamp;
End-Ds;";
    assert_eq!(text, expected);
}

#[test]
fn test_base_indent_and_indent_unit() {
    let generator = Generator::new(FormatKey::Lower, "  ").unwrap();
    let header = Header::new("s", StructureKind::Default);
    let fields = numbered(vec![Field::aggregate(
        "g",
        vec![Field::scalar("p", FieldType::Pointer)],
    )]);
    let text = generator.generate(&header, &fields, "\t").unwrap();
    assert_eq!(
        text,
        "\tdcl-ds s qualified;\n\t  dcl-ds g;\n\t    p pointer;\n\t  end-ds;\n\tend-ds;"
    );
}

#[test]
fn test_malformed_field_becomes_comment() {
    let header = Header::new("s", StructureKind::Default);
    let fields = numbered(vec![
        Field::scalar("amt", FieldType::PackedDecimal).with_length("2:13"),
        Field::scalar("ok", FieldType::Date),
    ]);
    let text = generate(&header, &fields, FormatKey::Lower, "").unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("   // invalid field 'amt':"), "{}", lines[1]);
    assert_eq!(lines[2], "   ok date;");
}

#[test]
fn test_validation_errors_abort() {
    let fields = vec![Field::scalar("a", FieldType::Date)];

    let nameless = Header::new("", StructureKind::Default);
    assert!(matches!(
        generate(&nameless, &fields, FormatKey::Lower, ""),
        Err(DsError::Validation { .. })
    ));

    let header = Header::new("s", StructureKind::Default);
    assert!(generate(&header, &fields, FormatKey::Lower, "x").is_err());

    // Both fields still carry id 0.
    let duplicate = vec![
        Field::scalar("a", FieldType::Date),
        Field::scalar("b", FieldType::Date),
    ];
    assert!(generate(&header, &duplicate, FormatKey::Lower, "").is_err());
    assert_eq!(
        generate(&header, &numbered(duplicate), FormatKey::Lower, "").unwrap(),
        "dcl-ds s qualified;\n   a date;\n   b date;\nend-ds;"
    );

    let mut scalar_with_children = Field::scalar("a", FieldType::Date);
    scalar_with_children.children.push(Field {
        id: 1,
        ..Field::scalar("b", FieldType::Date)
    });
    assert!(generate(&header, &[scalar_with_children], FormatKey::Lower, "").is_err());

    assert!(Generator::new(FormatKey::Lower, "").is_err());
}

#[test]
fn test_generation_is_idempotent() {
    let header = Header::new("cust", StructureKind::VarLength).with_dimension("3");
    let fields = numbered(vec![
        Field::scalar("a", FieldType::Binary).with_length("4").with_init("-1"),
        Field::aggregate("b", vec![Field::scalar("c", FieldType::Time)]),
    ]);
    let first = generate(&header, &fields, FormatKey::Upper, "  ").unwrap();
    let second = generate(&header, &fields, FormatKey::Upper, "  ").unwrap();
    assert_eq!(first, second);
    assert!(!first.ends_with('\n'));
}
