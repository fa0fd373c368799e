// tests/session_tests.rs

use dsforge::{
    locate_and_parse_at_cursor, DsError, Field, FieldType, FormatKey, Header, LineSpan,
    Preferences, Session, StructureKind,
};

const SOURCE: &str = "\
   DCL-DS cust QUALIFIED DIM(10);
      id INT(10);
      DCL-DS addr;
         city CHAR(20);
      END-DS;
   END-DS;";

#[test]
fn test_load_edit_and_regenerate() {
    let prefs = Preferences {
        format: FormatKey::Lower,
        indent_width: 2,
    };
    let mut session = Session::new(&prefs);
    session.load(locate_and_parse_at_cursor(SOURCE, 1)).unwrap();

    assert_eq!(session.format, FormatKey::Upper);
    assert_eq!(session.span(), Some(LineSpan { start_line: 0, end_line: 5 }));
    assert_eq!(session.tree.len(), 3);

    session
        .tree
        .attach("addr", Field::scalar("zip", FieldType::Character).with_length("5"))
        .unwrap();
    let new_id = session
        .tree
        .append(Field::scalar("vip", FieldType::Indicator).with_init("*on"));
    assert_eq!(new_id, 4);

    let text = session.generate("   ").unwrap();
    let expected = "   DCL-DS cust QUALIFIED DIM(10);
     id INT(10);
     DCL-DS addr;
       city CHAR(20);
       zip CHAR(5);
     END-DS;
     vip IND INZ(*on);
   END-DS;";
    assert_eq!(text, expected);
}

#[test]
fn test_set_format_changes_output_only() {
    let mut session = Session::new(&Preferences::default());
    session.header = Header::new("t", StructureKind::Template);
    session.tree.append(Field::scalar("d", FieldType::Date));
    session.set_format(FormatKey::Title);
    assert_eq!(
        session.generate("").unwrap(),
        "Dcl-Ds t Qualified Template;\n   d Date;\nEnd-Ds;"
    );
}

#[test]
fn test_failed_import_leaves_session_empty() {
    let mut session = Session::new(&Preferences::default());
    session.load(locate_and_parse_at_cursor(SOURCE, 0)).unwrap();
    assert!(!session.tree.is_empty());

    let err = session
        .load(locate_and_parse_at_cursor("no structure here", 0))
        .unwrap_err();
    assert!(matches!(err, DsError::Validation { .. }));
    assert!(session.tree.is_empty());
    assert_eq!(session.header, Header::default());
    assert_eq!(session.span(), None);
}

#[test]
fn test_reset_clears_everything() {
    let mut session = Session::new(&Preferences::default());
    session.load(locate_and_parse_at_cursor(SOURCE, 2)).unwrap();
    // Line 2 opens the nested aggregate, so it is selected on its own.
    assert_eq!(session.header.name, "addr");
    session.reset();
    assert!(session.tree.is_empty());
    assert!(session.generate("").is_err());
}
