use umlsync_parser::{error::ErrorCode, parse};

#[test]
fn test_parse_resolves_associations_across_classes() {
    let source = r#"
        <Classes>
          <Class n="Player" b="Entity" t="Controllable hero">
            <Fields>
              <Field v="- weapon: Weapon" t="Equipped weapon"/>
              <Field v="- party: List&lt;Companion&gt;"/>
              <Field v="- hp: int"/>
            </Fields>
            <Methods><Method v="+ Attack(target: Enemy): void"/></Methods>
          </Class>
          <Class n="Weapon"/>
          <Class n="Companion">
            <Fields><Field v="- leader: Player"/></Fields>
          </Class>
          <Class n="Enemy"/>
        </Classes>
    "#;

    let model = parse(source).expect("Failed to parse");
    assert_eq!(model.len(), 4);

    let player = model.find_by_name("Player").unwrap();
    let weapon = model.find_by_name("Weapon").unwrap();
    let companion = model.find_by_name("Companion").unwrap();
    let enemy = model.find_by_name("Enemy").unwrap();

    assert_eq!(model.get(player).associations(), &[weapon, companion]);
    assert_eq!(model.get(companion).associations(), &[player]);
    // Method parameters do not create associations.
    assert!(!model.get(player).is_associated_with(enemy));

    assert_eq!(
        model.get(player).full_name(),
        "Player<br/>&lt;&lt;Entity&gt;&gt;"
    );
    assert_eq!(model.get(player).fields_tooltip(), "weapon: Equipped weapon");
}

#[test]
fn test_parse_empty_document() {
    let model = parse("<Classes/>").expect("Failed to parse");

    assert!(model.is_empty());
}

#[test]
fn test_parse_collects_all_errors() {
    let source = r#"
        <Classes>
          <Class/>
          <Class n="A"/>
          <Class n="A"/>
        </Classes>
    "#;

    let err = parse(source).unwrap_err();
    let codes: Vec<_> = err.diagnostics().iter().map(|d| d.code()).collect();

    assert_eq!(codes, [Some(ErrorCode::E101), Some(ErrorCode::E200)]);
    assert_eq!(
        err.to_string(),
        "error[E101]: class element has no name (+1 more)"
    );
}

#[test]
fn test_parse_malformed_xml() {
    let err = parse("<Classes><Class n=\"A\">").unwrap_err();

    assert_eq!(err.diagnostics().len(), 1);
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E100));
}
