use repertoire::error::RepertoireError;
use repertoire::model::tree::find_node;
use repertoire::model::{Color, Metadata, NodeId, RepertoireNode};
use repertoire::service::{
    InMemoryStore, OwnerId, Repertoire, RepertoireId, RepertoireLimits, RepertoireService,
    RepertoireStore, StoreError,
};
use std::collections::HashSet;

fn service() -> RepertoireService<InMemoryStore> {
    init_tracing();
    RepertoireService::new(InMemoryStore::new())
}

/// Routes log output through the test harness; later calls are no-ops.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn node_by_moves<'a>(root: &'a RepertoireNode, moves: &[&str]) -> &'a RepertoireNode {
    moves
        .iter()
        .fold(root, |node, san| node.child(san).expect("line present"))
}

fn with_lines(
    service: &mut RepertoireService<InMemoryStore>,
    owner: OwnerId,
    name: &str,
    color: Color,
    pgn: &str,
) -> Repertoire {
    let rep = service.create_repertoire(owner, name, color).unwrap();
    service.import_pgn(rep.id, pgn).unwrap()
}

/// Store whose deletes fail for chosen ids.
struct FlakyStore {
    inner: InMemoryStore,
    undeletable: HashSet<RepertoireId>,
}

impl RepertoireStore for FlakyStore {
    fn get_by_id(&self, id: RepertoireId) -> Result<Option<Repertoire>, StoreError> {
        self.inner.get_by_id(id)
    }

    fn save(&mut self, id: RepertoireId, tree: RepertoireNode, metadata: Metadata) -> Result<Repertoire, StoreError> {
        self.inner.save(id, tree, metadata)
    }

    fn create(&mut self, owner: OwnerId, name: &str, color: Color) -> Result<Repertoire, StoreError> {
        self.inner.create(owner, name, color)
    }

    fn delete(&mut self, id: RepertoireId) -> Result<(), StoreError> {
        if self.undeletable.contains(&id) {
            return Err(StoreError::Backend("disk on fire".to_string()));
        }
        self.inner.delete(id)
    }

    fn count_for_owner(&self, owner: OwnerId) -> Result<usize, StoreError> {
        self.inner.count_for_owner(owner)
    }
}

// --- TESTS CREATE AND NAMES ---
#[test]
fn test_create_repertoire() {
    let mut service = service();
    let owner = OwnerId::new();
    let rep = service.create_repertoire(owner, "  Sicilian  ", Color::Black).unwrap();

    assert_eq!(rep.name, "Sicilian");
    assert_eq!(rep.color, Color::Black);
    assert_eq!(rep.owner_id, owner);
    assert!(rep.tree.is_leaf());
    assert_eq!(rep.metadata.total_nodes, 1);
    assert_eq!(service.get(rep.id).unwrap(), rep);
}

#[test]
fn test_name_policies() {
    let mut service = service();
    let owner = OwnerId::new();
    assert!(matches!(
        service.create_repertoire(owner, "   ", Color::White),
        Err(RepertoireError::NameRequired)
    ));

    let long = "x".repeat(101);
    assert!(matches!(
        service.create_repertoire(owner, &long, Color::White),
        Err(RepertoireError::NameTooLong { max: 100 })
    ));
    // exactly at the limit, counted in characters
    let at_limit = "é".repeat(100);
    assert!(service.create_repertoire(owner, &at_limit, Color::White).is_ok());
}

#[test]
fn test_repertoire_limit_per_owner() {
    let limits = RepertoireLimits::default().with_max_repertoires_per_owner(2);
    let mut service = service().with_limits(limits);
    let owner = OwnerId::new();
    service.create_repertoire(owner, "one", Color::White).unwrap();
    service.create_repertoire(owner, "two", Color::White).unwrap();

    let err = service.create_repertoire(owner, "three", Color::White).unwrap_err();
    assert!(matches!(err, RepertoireError::LimitReached { max: 2 }));
    // other owners are unaffected
    assert!(service.create_repertoire(OwnerId::new(), "three", Color::White).is_ok());
}

#[test]
fn test_get_and_delete() {
    let mut service = service();
    let rep = service.create_repertoire(OwnerId::new(), "tmp", Color::White).unwrap();
    service.delete_repertoire(rep.id).unwrap();
    assert!(matches!(service.get(rep.id), Err(RepertoireError::NotFound(id)) if id == rep.id));
    assert!(matches!(service.delete_repertoire(rep.id), Err(RepertoireError::NotFound(_))));
}

// --- TESTS IMPORT AND EDIT ---
#[test]
fn test_import_merges_into_existing_lines() {
    let mut service = service();
    let owner = OwnerId::new();
    let rep = with_lines(&mut service, owner, "e4", Color::White, "1. e4 e5 2. Nf3");
    let rep = service.import_pgn(rep.id, "[Event \"x\"]\n1. e4 c5 2. Nf3 *").unwrap();

    assert_eq!(rep.metadata.total_nodes, 6);
    assert_eq!(rep.metadata.deepest_depth, 3);
    assert_eq!(service.get(rep.id).unwrap().metadata, rep.metadata);
}

#[test]
fn test_failed_import_saves_nothing() {
    let mut service = service();
    let rep = with_lines(&mut service, OwnerId::new(), "e4", Color::White, "1. e4 e5");
    let err = service.import_pgn(rep.id, "1. d4 d5 2. Ke7").unwrap_err();
    assert!(matches!(err, RepertoireError::Parsing(_)));
    assert_eq!(service.get(rep.id).unwrap(), rep);
}

#[test]
fn test_add_move() {
    let mut service = service();
    let rep = with_lines(&mut service, OwnerId::new(), "e4", Color::White, "1. e4 e5");
    let e5 = node_by_moves(&rep.tree, &["e4", "e5"]).id();

    let (rep, nf3) = service.add_move(rep.id, e5, "Nf3").unwrap();
    let node = find_node(&rep.tree, nf3).unwrap();
    assert_eq!(node.san(), Some("Nf3"));
    assert_eq!(node.parent_id(), Some(e5));
    assert_eq!(node.move_number(), 2);
    assert_eq!(node.color_to_move(), Color::Black);
    assert_eq!(rep.metadata.total_nodes, 4);
}

#[test]
fn test_add_move_errors() {
    let mut service = service();
    let rep = with_lines(&mut service, OwnerId::new(), "e4", Color::White, "1. e4 e5");
    let e4 = node_by_moves(&rep.tree, &["e4"]).id();

    let missing = NodeId::new();
    assert!(matches!(
        service.add_move(rep.id, missing, "d4"),
        Err(RepertoireError::ParentNotFound(id)) if id == missing
    ));
    assert!(matches!(
        service.add_move(rep.id, e4, "e5"),
        Err(RepertoireError::MoveAlreadyExists(san)) if san == "e5"
    ));
    assert!(matches!(
        service.add_move(rep.id, e4, "e4"),
        Err(RepertoireError::IllegalMove(san)) if san == "e4"
    ));
    assert_eq!(service.get(rep.id).unwrap(), rep);
}

#[test]
fn test_delete_node() {
    let mut service = service();
    let rep = with_lines(&mut service, OwnerId::new(), "e4", Color::White, "1. e4 e5 (1... c5 2. Nf3)");
    let c5 = node_by_moves(&rep.tree, &["e4", "c5"]).id();

    let rep = service.delete_node(rep.id, c5).unwrap();
    assert!(find_node(&rep.tree, c5).is_none());
    assert_eq!(rep.metadata.total_nodes, 3);

    let root = rep.tree.id();
    assert!(matches!(service.delete_node(rep.id, root), Err(RepertoireError::CannotDeleteRoot)));
    assert!(matches!(service.delete_node(rep.id, c5), Err(RepertoireError::NodeNotFound(_))));
}

#[test]
fn test_set_comment() {
    let mut service = service();
    let rep = with_lines(&mut service, OwnerId::new(), "e4", Color::White, "1. e4 e5");
    let e4 = node_by_moves(&rep.tree, &["e4"]).id();

    let rep = service.set_comment(rep.id, e4, Some("  main weapon ")).unwrap();
    assert_eq!(find_node(&rep.tree, e4).unwrap().comment(), Some("main weapon"));
    let rep = service.set_comment(rep.id, e4, Some("   ")).unwrap();
    assert_eq!(find_node(&rep.tree, e4).unwrap().comment(), None);

    let root = rep.tree.id();
    assert!(matches!(
        service.set_comment(rep.id, root, Some("x")),
        Err(RepertoireError::CannotCommentRoot)
    ));
}

#[test]
fn test_canonicalize_transpositions() {
    let mut service = service();
    let rep = with_lines(
        &mut service,
        OwnerId::new(),
        "1. e4",
        Color::White,
        "1. e4 (1. Nf3 e5 2. e4 Nc6) 1... e5 2. Nf3 Nc6",
    );
    assert_eq!(rep.metadata.total_nodes, 9);
    let (rep, report) = service.canonicalize_transpositions(rep.id).unwrap();
    assert_eq!(report.folded, 1);
    // both lines continue with Nc6, which is now stored once
    assert_eq!(rep.metadata.total_nodes, 8);
    assert_eq!(service.get(rep.id).unwrap(), rep);
}

// --- TESTS MERGE ---
#[test]
fn test_merge_repertoires() {
    let mut service = service();
    let owner = OwnerId::new();
    let a = with_lines(&mut service, owner, "open", Color::White, "1. e4 e5 2. Nf3");
    let b = with_lines(&mut service, owner, "sicilian", Color::White, "1. e4 c5 2. Nf3");
    let c = with_lines(&mut service, owner, "queen pawn", Color::White, "1. d4 d5");

    let merged = service.merge_repertoires(owner, &[a.id, b.id, c.id], "Everything").unwrap();
    assert_eq!(merged.name, "Everything");
    assert_eq!(merged.color, Color::White);
    assert_eq!(merged.metadata.total_nodes, 8);
    let moves: Vec<_> = merged.tree.children().iter().filter_map(|n| n.san()).collect();
    assert_eq!(moves, vec!["e4", "d4"]);

    for id in [a.id, b.id, c.id] {
        assert!(matches!(service.get(id), Err(RepertoireError::NotFound(_))));
    }
    assert_eq!(service.store().list_for_owner(owner).len(), 1);
}

#[test]
fn test_merge_preconditions() {
    let mut service = service();
    let owner = OwnerId::new();
    let a = with_lines(&mut service, owner, "a", Color::White, "1. e4");
    let b = with_lines(&mut service, owner, "b", Color::Black, "1. d4 Nf6");
    let foreign = with_lines(&mut service, OwnerId::new(), "c", Color::White, "1. c4");

    assert!(matches!(
        service.merge_repertoires(owner, &[a.id], "m"),
        Err(RepertoireError::MergeMinimumTwo)
    ));
    assert!(matches!(
        service.merge_repertoires(owner, &[a.id, a.id], "m"),
        Err(RepertoireError::MergeDuplicateIds)
    ));
    assert!(matches!(
        service.merge_repertoires(owner, &[a.id, b.id], " "),
        Err(RepertoireError::NameRequired)
    ));
    assert!(matches!(
        service.merge_repertoires(owner, &[a.id, b.id], "m"),
        Err(RepertoireError::MergeColorMismatch)
    ));
    assert!(matches!(
        service.merge_repertoires(owner, &[a.id, foreign.id], "m"),
        Err(RepertoireError::NotFound(id)) if id == foreign.id
    ));
    assert!(matches!(
        service.merge_repertoires(owner, &[a.id, RepertoireId::new()], "m"),
        Err(RepertoireError::NotFound(_))
    ));

    // nothing was written or deleted
    assert_eq!(service.store().len(), 3);
    assert_eq!(service.get(a.id).unwrap(), a);
}

#[test]
fn test_merge_respects_limit() {
    let limits = RepertoireLimits::default().with_max_repertoires_per_owner(2);
    let mut service = service().with_limits(limits);
    let owner = OwnerId::new();
    let a = with_lines(&mut service, owner, "a", Color::White, "1. e4");
    let b = with_lines(&mut service, owner, "b", Color::White, "1. d4");

    let err = service.merge_repertoires(owner, &[a.id, b.id], "m").unwrap_err();
    assert!(matches!(err, RepertoireError::LimitReached { max: 2 }));
    assert_eq!(service.store().len(), 2);
}

#[test]
fn test_merge_source_deletion_failure_keeps_merged() {
    let mut inner = InMemoryStore::new();
    let owner = OwnerId::new();
    let a = inner.create(owner, "a", Color::White).unwrap();
    let b = inner.create(owner, "b", Color::White).unwrap();
    let store = FlakyStore {
        inner,
        undeletable: HashSet::from([b.id]),
    };
    let mut service = RepertoireService::new(store);
    service.import_pgn(a.id, "1. e4 e5").unwrap();
    service.import_pgn(b.id, "1. e4 c5").unwrap();

    let err = service.merge_repertoires(owner, &[a.id, b.id], "merged").unwrap_err();
    let RepertoireError::SourceDeletionFailed { merged, failed } = &err else {
        panic!("expected SourceDeletionFailed, got {err:?}");
    };
    assert_eq!(failed, &vec![b.id]);

    // the merged repertoire stays, the deletable source is gone
    let merged = service.get(*merged).unwrap();
    assert_eq!(merged.metadata.total_nodes, 4);
    assert!(service.get(a.id).is_err());
    assert!(service.get(b.id).is_ok());
}

// --- TESTS EXTRACT ---
#[test]
fn test_extract_subtree_default_name() {
    let mut service = service();
    let owner = OwnerId::new();
    let rep = with_lines(&mut service, owner, "Black", Color::Black, "1. e4 c5 (1... e5 2. Nf3 Nc6) 2. Nf3");
    let e5 = node_by_moves(&rep.tree, &["e4", "e5"]).id();

    let (pruned, extracted) = service.extract_subtree(rep.id, e5, None).unwrap();
    assert_eq!(extracted.name, "Black - e5");
    assert_eq!(extracted.color, Color::Black);
    assert_eq!(extracted.owner_id, owner);
    assert_eq!(extracted.metadata.total_nodes, 5);
    assert_eq!(pruned.id, rep.id);
    assert_eq!(pruned.metadata.total_nodes, 4);
    assert_eq!(service.get(rep.id).unwrap(), pruned);
    assert_eq!(service.get(extracted.id).unwrap(), extracted);
}

#[test]
fn test_extract_subtree_named_and_errors() {
    let mut service = service();
    let rep = with_lines(&mut service, OwnerId::new(), "x", Color::White, "1. e4 e5");
    let e5 = node_by_moves(&rep.tree, &["e4", "e5"]).id();

    let (_, extracted) = service.extract_subtree(rep.id, e5, Some(" King's pawn ")).unwrap();
    assert_eq!(extracted.name, "King's pawn");

    let root = rep.tree.id();
    assert!(matches!(
        service.extract_subtree(rep.id, root, None),
        Err(RepertoireError::CannotExtractRoot)
    ));
    assert!(matches!(
        service.extract_subtree(rep.id, NodeId::new(), None),
        Err(RepertoireError::NodeNotFound(_))
    ));
}
