use float_cmp::assert_approx_eq;

use umlsync::{
    Synchronizer, UmlSyncError,
    config::{AppConfig, CleanupConfig},
    document::{CellId, CellKind, Document, EdgeKind, GeometryUpdate},
    model::ClassModel,
};

fn synchronizer(cleanup: CleanupConfig) -> Synchronizer {
    Synchronizer::new(AppConfig::default().with_cleanup(cleanup))
}

fn model(source: &str) -> ClassModel {
    Synchronizer::default()
        .parse(source)
        .expect("Failed to parse")
}

fn container(document: &Document, label: &str) -> CellId {
    document
        .find_cell(|cell| cell.kind() == CellKind::Container && cell.label() == Some(label))
        .map(|cell| cell.id().clone())
        .unwrap_or_else(|| panic!("no container labelled {label}"))
}

fn count(document: &Document, kind: CellKind) -> usize {
    document.cells_matching(|cell| cell.kind() == kind).count()
}

fn edges(document: &Document, kind: EdgeKind) -> Vec<(CellId, CellId)> {
    document
        .cells_matching(|cell| cell.kind() == CellKind::Edge(kind))
        .map(|cell| (cell.source().unwrap().clone(), cell.target().unwrap().clone()))
        .collect()
}

const GAME: &str = r#"
<Classes>
  <Class n="Player" b="Entity" t="The hero">
    <Fields>
      <Field v="- weapon: Weapon" t="Equipped weapon"/>
      <Field v="- hp: int"/>
    </Fields>
    <Methods><Method v="+ Attack(): void" t="Hits once"/></Methods>
  </Class>
  <Class n="Weapon">
    <Fields><Field v="- owner: Player"/></Fields>
  </Class>
  <Class n="Entity"/>
</Classes>
"#;

#[test]
fn test_second_run_changes_nothing() {
    let model = model(GAME);
    let synchronizer = Synchronizer::default();

    let mut document = Document::new();
    let first = synchronizer.sync_document(&mut document, &model);
    let saved = document.to_xml_string();

    let mut reloaded = Document::parse(&saved).expect("Failed to reload");
    let second = synchronizer.sync_document(&mut reloaded, &model);

    assert!(!first.is_unchanged());
    assert!(second.is_unchanged(), "second run changed: {second}");
    assert_eq!(reloaded.to_xml_string(), saved);
}

#[test]
fn test_mutual_associations_share_one_edge() {
    let model = model(GAME);
    let mut document = Document::new();
    Synchronizer::default().sync_document(&mut document, &model);

    let player = container(&document, "Player<br/>&lt;&lt;Entity&gt;&gt;");
    let weapon = container(&document, "Weapon");
    let entity = container(&document, "Entity");

    assert_eq!(edges(&document, EdgeKind::Bidirectional), [(player.clone(), weapon)]);
    assert!(edges(&document, EdgeKind::Association).is_empty());
    assert_eq!(edges(&document, EdgeKind::Extends), [(player, entity)]);
}

#[test]
fn test_existing_container_keeps_its_position() {
    let model = model(GAME);
    let synchronizer = Synchronizer::default();
    let mut document = Document::new();
    synchronizer.sync_document(&mut document, &model);

    let weapon = container(&document, "Weapon");
    document.set_geometry(&weapon, GeometryUpdate::new().with_x(700.0).with_y(30.0));
    let report = synchronizer.sync_document(&mut document, &model);

    let geometry = document.cell(&weapon).and_then(|cell| cell.geometry()).unwrap();
    assert!(report.is_unchanged());
    assert_eq!(geometry.x(), Some(700.0));
    assert_eq!(geometry.y(), Some(30.0));
}

#[test]
fn test_blocks_follow_the_model() {
    let both = model(
        r#"<Classes><Class n="A">
             <Fields><Field v="- hp: int"/></Fields>
             <Methods><Method v="+ Run(): void"/></Methods>
           </Class></Classes>"#,
    );
    let fields_only = model(
        r#"<Classes><Class n="A"><Fields><Field v="- hp: int"/></Fields></Class></Classes>"#,
    );
    let synchronizer = Synchronizer::default();
    let mut document = Document::new();

    let report = synchronizer.sync_document(&mut document, &both);
    assert_eq!(report.created(), 4);
    let a = container(&document, "A");
    let height = |document: &Document| {
        document
            .cell(&a)
            .and_then(|cell| cell.geometry())
            .and_then(|geometry| geometry.height())
            .unwrap()
    };
    assert_approx_eq!(f32, height(&document), 110.0);

    let report = synchronizer.sync_document(&mut document, &fields_only);
    assert_eq!(report.removed(), 2);
    assert_eq!(count(&document, CellKind::Item), 1);
    assert_eq!(count(&document, CellKind::Separator), 0);
    assert_approx_eq!(f32, height(&document), 74.0);

    let report = synchronizer.sync_document(&mut document, &both);
    assert_eq!(report.created(), 2);
    assert_eq!(count(&document, CellKind::Item), 2);
    assert_eq!(count(&document, CellKind::Separator), 1);
    assert_approx_eq!(f32, height(&document), 110.0);
}

#[test]
fn test_class_cleanup_is_opt_in() {
    let before = model(
        r#"<Classes>
             <Class n="A"/>
             <Class n="Old"><Fields><Field v="- a: A"/></Fields></Class>
           </Classes>"#,
    );
    let after = model(r#"<Classes><Class n="A"/></Classes>"#);

    let mut document = Document::new();
    Synchronizer::default().sync_document(&mut document, &before);
    let kept = Synchronizer::default().sync_document(&mut document, &after);

    assert_eq!(kept.removed(), 0);
    assert_eq!(count(&document, CellKind::Container), 2);

    let cleaned =
        synchronizer(CleanupConfig::new(true, false, false)).sync_document(&mut document, &after);

    // The container, its fields block and its association edge.
    assert_eq!(cleaned.removed(), 3);
    assert_eq!(count(&document, CellKind::Container), 1);
    assert!(edges(&document, EdgeKind::Association).is_empty());
}

#[test]
fn test_association_cleanup_turns_edge_around() {
    let forward = model(
        r#"<Classes>
             <Class n="A"><Fields><Field v="- b: B"/></Fields></Class>
             <Class n="B"/>
           </Classes>"#,
    );
    let backward = model(
        r#"<Classes>
             <Class n="A"/>
             <Class n="B"><Fields><Field v="- a: A"/></Fields></Class>
           </Classes>"#,
    );

    let mut document = Document::new();
    Synchronizer::default().sync_document(&mut document, &forward);
    let a = container(&document, "A");
    let b = container(&document, "B");
    assert_eq!(edges(&document, EdgeKind::Association), [(a.clone(), b.clone())]);

    let mut without_cleanup = document.clone();
    Synchronizer::default().sync_document(&mut without_cleanup, &backward);
    assert_eq!(
        edges(&without_cleanup, EdgeKind::Bidirectional),
        [(a.clone(), b.clone())]
    );

    synchronizer(CleanupConfig::new(false, true, false)).sync_document(&mut document, &backward);
    assert_eq!(edges(&document, EdgeKind::Association), [(b, a)]);
    assert!(edges(&document, EdgeKind::Bidirectional).is_empty());
}

#[test]
fn test_association_cleanup_removes_stale_and_duplicate_edges() {
    let related = model(
        r#"<Classes>
             <Class n="A"><Fields><Field v="- b: B"/></Fields></Class>
             <Class n="B"/>
           </Classes>"#,
    );
    let unrelated = model(r#"<Classes><Class n="A"/><Class n="B"/></Classes>"#);
    let cleanup = synchronizer(CleanupConfig::new(false, true, false));

    let mut document = Document::new();
    cleanup.sync_document(&mut document, &related);
    let a = container(&document, "A");
    let b = container(&document, "B");
    let mut duplicated = document.clone();

    cleanup.sync_document(&mut document, &unrelated);
    assert!(edges(&document, EdgeKind::Association).is_empty());

    // A second edge for the same pair, drawn the other way round.
    let xml = duplicated.to_xml_string().replace(
        "</root>",
        &format!(
            r#"  <mxCell id="99" style="endArrow=classic;" edge="1" parent="1" source="{b}" target="{a}" />
      </root>"#
        ),
    );
    duplicated = Document::parse(&xml).unwrap();
    let report = cleanup.sync_document(&mut duplicated, &related);

    assert_eq!(report.removed(), 1);
    assert_eq!(edges(&duplicated, EdgeKind::Association), [(a, b)]);
    assert!(edges(&duplicated, EdgeKind::Bidirectional).is_empty());
}

#[test]
fn test_extends_cleanup_drops_old_base_edge() {
    let before = model(
        r#"<Classes>
             <Class n="Entity"/><Class n="Actor"/><Class n="Player" b="Entity"/>
           </Classes>"#,
    );
    let after = model(
        r#"<Classes>
             <Class n="Entity"/><Class n="Actor"/><Class n="Player" b="Actor"/>
           </Classes>"#,
    );

    let mut document = Document::new();
    Synchronizer::default().sync_document(&mut document, &before);
    synchronizer(CleanupConfig::new(false, false, true)).sync_document(&mut document, &after);

    let player = container(&document, "Player<br/>&lt;&lt;Actor&gt;&gt;");
    let actor = container(&document, "Actor");
    assert_eq!(edges(&document, EdgeKind::Extends), [(player, actor)]);
    // Without class cleanup the renamed container stays.
    container(&document, "Player<br/>&lt;&lt;Entity&gt;&gt;");
}

#[test]
fn test_sync_file_creates_and_updates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.drawio");
    let model = model(GAME);
    let synchronizer = Synchronizer::default();

    let first = synchronizer.sync_file(&path, &model).expect("first run");
    let saved = std::fs::read_to_string(&path).unwrap();
    let second = synchronizer.sync_file(&path, &model).expect("second run");

    assert_eq!(first.created(), 9);
    assert!(second.is_unchanged());
    assert!(saved.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), saved);
}

#[test]
fn test_sync_file_rejects_foreign_xml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.drawio");
    std::fs::write(&path, "<svg/>").unwrap();

    let err = Synchronizer::default()
        .sync_file(&path, &model(GAME))
        .unwrap_err();

    assert!(matches!(err, UmlSyncError::Format(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "<svg/>");
}

#[test]
fn test_parse_error_keeps_source() {
    let err = Synchronizer::default().parse("<Classes><Class/></Classes>").unwrap_err();

    match err {
        UmlSyncError::Parse { err, src } => {
            assert_eq!(src, "<Classes><Class/></Classes>");
            assert_eq!(err.to_string(), "error[E101]: class element has no name");
        }
        other => panic!("unexpected error: {other}"),
    }
}
