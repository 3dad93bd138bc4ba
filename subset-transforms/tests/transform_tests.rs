use mockall::mock;
use proptest::prelude::*;
use subset_core::Error as CoreError;
use subset_transforms::{
    Cluster, DataKind, DatasetId, FixedOptions, InMemoryHost, NotificationSink, OptionInput, Partition,
    PointData, RecordingSink, SubsetConfig, SubsetOptions, SubsetTransform, TransformType,
};
use test_case::test_case;

mock! {
    pub Sink {}
    impl NotificationSink for Sink {
        fn dataset_added(&mut self, id: DatasetId);
        fn dataset_data_changed(&mut self, id: DatasetId);
    }
}

mock! {
    pub Input {}
    impl OptionInput for Input {
        fn request_options(&mut self) -> Option<SubsetOptions>;
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("subset_transforms=debug")
        .with_test_writer()
        .try_init();
}

fn names(n: &[&str]) -> Vec<String> {
    n.iter().map(|s| (*s).to_string()).collect()
}

fn five_rows() -> PointData {
    PointData::from_rows(
        names(&["x", "y"]),
        &[
            vec![1.0, 2.0],
            vec![3.0, 4.0],
            vec![5.0, 6.0],
            vec![7.0, 8.0],
            vec![9.0, 10.0],
        ],
    )
    .unwrap()
}

struct Fixture {
    host: InMemoryHost,
    cells: DatasetId,
    tsne: DatasetId,
    louvain: DatasetId,
}

fn fixture(selection: Vec<usize>) -> Fixture {
    let mut host = InMemoryHost::new();
    let cells = host.add_points("cells", five_rows(), None);
    host.set_selection(cells, selection).unwrap();

    let embedding = PointData::from_rows(
        names(&["tsne 1", "tsne 2"]),
        &[
            vec![0.0, 0.5],
            vec![1.0, 1.5],
            vec![2.0, 2.5],
            vec![3.0, 3.5],
            vec![4.0, 4.5],
        ],
    )
    .unwrap();
    let tsne = host.add_points("tsne", embedding, Some(cells));
    let louvain = host.add_clusters(
        "louvain",
        Partition::from_clusters([
            Cluster::new("A", vec![0, 1, 4]).with_id("a"),
            Cluster::new("B", vec![2, 4]).with_id("b"),
            Cluster::new("C", vec![3]).with_id("c"),
        ]),
        cells,
    );

    Fixture {
        host,
        cells,
        tsne,
        louvain,
    }
}

fn run(
    host: &mut InMemoryHost,
    transform: TransformType,
    inputs: &[DatasetId],
    options: Option<SubsetOptions>,
    sink: &mut RecordingSink,
) -> subset_core::Result<subset_transforms::TransformReport> {
    SubsetTransform::new(transform, SubsetConfig::default()).run(host, inputs, &mut FixedOptions(options), sink)
}

#[test]
fn test_simple_subset_rows_in_selection_order() {
    let Fixture { mut host, cells, .. } = fixture(vec![1, 3]);
    let mut sink = RecordingSink::default();

    let report = run(&mut host, TransformType::Simple, &[cells], None, &mut sink).unwrap();
    assert!(report.is_complete());

    let subset = report.created[0].artifacts.root;
    let data = host.points_data(subset).unwrap();
    assert_eq!(data.row(0).unwrap(), &[3.0, 4.0]);
    assert_eq!(data.row(1).unwrap(), &[7.0, 8.0]);
    assert_eq!(data.dimension_names(), &names(&["x", "y"])[..]);

    assert_eq!(host.name_of(subset), Some("cells_Subset"));
    assert_eq!(host.parent_of(subset), Some(cells));
    assert!(report.created[0].artifacts.children.is_empty());
    assert_eq!(host.property(cells, "Last transformed by"), Some("SubsetFromSelection"));
    assert_eq!(sink.added, vec![subset]);
    assert_eq!(sink.changed, vec![subset]);
}

#[test]
fn test_empty_selection_skips_dataset_only() {
    init_logging();
    let Fixture { mut host, cells, .. } = fixture(Vec::new());
    let other = host.add_points("other", five_rows(), None);
    host.set_selection(other, vec![4]).unwrap();
    let before = host.len();
    let mut sink = RecordingSink::default();

    let report = run(&mut host, TransformType::Simple, &[cells, other], None, &mut sink).unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].source, cells);
    assert!(matches!(report.skipped[0].error, CoreError::EmptySelection { ref dataset } if dataset == "cells"));
    assert_eq!(report.created.len(), 1);
    assert_eq!(report.created[0].source, other);
    assert_eq!(host.len(), before + 1);
    assert_eq!(host.property(cells, "Last transformed by"), None);
    assert!(!host.is_locked(cells));
}

#[test]
fn test_extended_with_children_remaps_clusters() {
    init_logging();
    let Fixture {
        mut host,
        cells,
        tsne,
        louvain,
    } = fixture(vec![1, 3]);
    let mut sink = RecordingSink::default();
    let options = SubsetOptions {
        include_children: true,
        create_subset_as_child: false,
    };

    let report = run(&mut host, TransformType::Extended, &[cells], Some(options), &mut sink).unwrap();
    let artifacts = &report.created[0].artifacts;
    assert_eq!(artifacts.children.len(), 2);

    let new_tsne = artifacts.children[0];
    assert_eq!(host.name_of(new_tsne), host.name_of(tsne));
    assert!(host.is_derived(new_tsne));
    assert_eq!(host.parent_of(new_tsne), Some(artifacts.root));
    let tsne_data = host.points_data(new_tsne).unwrap();
    assert_eq!(tsne_data.values(), &[1.0, 1.5, 3.0, 3.5]);
    assert_eq!(tsne_data.dimension_names(), &names(&["tsne 1", "tsne 2"])[..]);

    let new_louvain = artifacts.children[1];
    assert_eq!(host.name_of(new_louvain), host.name_of(louvain));
    let partition = host.partition(new_louvain).unwrap();
    let summary: Vec<_> = partition.iter().map(|c| (c.name(), c.id(), c.indices().to_vec())).collect();
    assert_eq!(summary, vec![("A", "a", vec![0]), ("C", "c", vec![1])]);

    // source partition untouched
    assert_eq!(host.partition(louvain).unwrap().len(), 3);
}

#[test_case(false ; "separate requested")]
#[test_case(true ; "child requested")]
fn test_including_children_places_subset_separately(as_child: bool) {
    let Fixture { mut host, cells, .. } = fixture(vec![0, 2]);
    let mut sink = RecordingSink::default();
    let options = SubsetOptions {
        include_children: true,
        create_subset_as_child: as_child,
    };

    let report = run(&mut host, TransformType::Extended, &[cells], Some(options), &mut sink).unwrap();
    assert_eq!(host.parent_of(report.created[0].artifacts.root), None);
}

#[test_case(true, true ; "as child")]
#[test_case(false, false ; "separate")]
fn test_extended_without_children_placement(as_child: bool, under_source: bool) {
    let Fixture { mut host, cells, .. } = fixture(vec![0]);
    let mut sink = RecordingSink::default();
    let options = SubsetOptions {
        include_children: false,
        create_subset_as_child: as_child,
    };

    let report = run(&mut host, TransformType::Extended, &[cells], Some(options), &mut sink).unwrap();
    let root = report.created[0].artifacts.root;
    assert_eq!(host.parent_of(root) == Some(cells), under_source);
    assert!(report.created[0].artifacts.children.is_empty());
}

#[test]
fn test_simple_twice_creates_independent_subsets() {
    let Fixture { mut host, cells, .. } = fixture(vec![4, 0]);
    let mut sink = RecordingSink::default();

    let first = run(&mut host, TransformType::Simple, &[cells], None, &mut sink).unwrap();
    let second = run(&mut host, TransformType::Simple, &[cells], None, &mut sink).unwrap();

    let a = first.created[0].artifacts.root;
    let b = second.created[0].artifacts.root;
    assert_ne!(a, b);
    assert_eq!(host.points_data(a), host.points_data(b));
    assert_eq!(host.name_of(a), host.name_of(b));
    assert_eq!(host.children_of(cells).len(), 4);
}

#[test]
fn test_cancel_aborts_before_any_mutation() {
    let Fixture { mut host, cells, .. } = fixture(vec![1]);
    let before = host.len();

    let mut input = MockInput::new();
    input.expect_request_options().times(1).returning(|| None);
    let mut sink = MockSink::new();
    sink.expect_dataset_added().never();
    sink.expect_dataset_data_changed().never();

    let err = SubsetTransform::new(TransformType::Extended, SubsetConfig::default())
        .run(&mut host, &[cells], &mut input, &mut sink)
        .unwrap_err();

    assert!(matches!(err, CoreError::UserCancelled));
    assert_eq!(host.len(), before);
    assert!(host.lock_events().is_empty());
}

#[test]
fn test_simple_mode_never_asks_for_options() {
    let Fixture { mut host, cells, .. } = fixture(vec![1]);

    let mut input = MockInput::new();
    input.expect_request_options().never();
    let mut sink = MockSink::new();
    sink.expect_dataset_added().times(1).return_const(());
    sink.expect_dataset_data_changed().times(1).return_const(());

    let report = SubsetTransform::new(TransformType::Simple, SubsetConfig::default())
        .run(&mut host, &[cells], &mut input, &mut sink)
        .unwrap();
    assert_eq!(report.created.len(), 1);
}

#[test]
fn test_notifications_follow_registration() {
    let Fixture { mut host, cells, .. } = fixture(vec![2, 3]);
    let mut sink = RecordingSink::default();
    let options = SubsetOptions {
        include_children: true,
        create_subset_as_child: false,
    };

    let report = run(&mut host, TransformType::Extended, &[cells], Some(options), &mut sink).unwrap();
    let all: Vec<_> = report.created[0].artifacts.all().collect();
    assert_eq!(all.len(), 3);
    assert_eq!(sink.added, all);
    assert_eq!(sink.changed, all);
}

#[test]
fn test_source_lock_brackets_build() {
    let Fixture { mut host, cells, tsne, louvain } = fixture(vec![0, 1]);
    let mut sink = RecordingSink::default();
    let options = SubsetOptions {
        include_children: true,
        create_subset_as_child: false,
    };

    run(&mut host, TransformType::Extended, &[cells], Some(options), &mut sink).unwrap();

    let events = host.lock_events();
    assert_eq!(events.first(), Some(&(cells, true)));
    assert_eq!(events.last(), Some(&(cells, false)));
    assert!(events.contains(&(tsne, true)));
    assert!(events.contains(&(louvain, false)));
    assert!(![cells, tsne, louvain].iter().any(|&id| host.is_locked(id)));
}

#[test]
fn test_non_point_input_is_skipped() {
    let Fixture { mut host, cells, louvain, .. } = fixture(vec![0]);
    let mut sink = RecordingSink::default();

    let report = run(&mut host, TransformType::Simple, &[louvain, cells], None, &mut sink).unwrap();
    assert_eq!(report.skipped.len(), 1);
    assert!(matches!(report.skipped[0].error, CoreError::InvalidDataset(_)));
    assert_eq!(report.created.len(), 1);
}

#[test]
fn test_dangling_input_is_skipped() {
    let Fixture { mut host, cells, .. } = fixture(vec![0]);
    host.remove(cells);
    let mut sink = RecordingSink::default();

    let report = run(&mut host, TransformType::Simple, &[cells], None, &mut sink).unwrap();
    assert!(matches!(report.skipped[0].error, CoreError::InvalidDataset(_)));
    assert!(sink.added.is_empty());
}

#[test]
fn test_proxy_child_reads_full_dataset() {
    let Fixture { mut host, cells, .. } = fixture(vec![4]);
    let full = host.add_points(
        "umap",
        PointData::from_rows(names(&["u"]), &[vec![10.0], vec![11.0], vec![12.0], vec![13.0], vec![14.0]]).unwrap(),
        None,
    );
    host.add_proxy("umap view", DataKind::Points, full, cells);
    let mut sink = RecordingSink::default();
    let options = SubsetOptions {
        include_children: true,
        create_subset_as_child: false,
    };

    let report = run(&mut host, TransformType::Extended, &[cells], Some(options), &mut sink).unwrap();
    let children = &report.created[0].artifacts.children;
    assert_eq!(children.len(), 3);
    assert_eq!(host.name_of(children[2]), Some("umap view"));
    assert_eq!(host.points_data(children[2]).unwrap().values(), &[14.0]);
}

#[test]
fn test_view_input_reads_full_dataset() {
    let mut host = InMemoryHost::new();
    let full = host.add_points(
        "full",
        PointData::from_rows(names(&["v"]), &[vec![1.0], vec![2.0], vec![3.0]]).unwrap(),
        None,
    );
    let view = host.add_proxy("view", DataKind::Points, full, full);
    host.set_selection(view, vec![2]).unwrap();
    let mut sink = RecordingSink::default();

    let report = run(&mut host, TransformType::Simple, &[view], None, &mut sink).unwrap();
    assert!(report.is_complete());
    assert_eq!(report.created.len(), 1);

    let subset = report.created[0].artifacts.root;
    assert_eq!(host.name_of(subset), Some("view_Subset"));
    assert_eq!(host.parent_of(subset), Some(view));
    assert_eq!(host.points_data(subset).unwrap().values(), &[3.0]);
    assert_eq!(host.property(view, "Last transformed by"), Some("SubsetFromSelection"));

    // the view brackets the build, its full dataset the copy
    let events = host.lock_events();
    assert_eq!(events, vec![(view, true), (full, true), (full, false), (view, false)]);
    assert!(!host.is_locked(view) && !host.is_locked(full));
}

#[test]
fn test_all_clusters_dropped_still_creates_partition() {
    let Fixture { mut host, cells, .. } = fixture(vec![2]);
    let sparse = host.add_clusters("sparse", Partition::from_clusters([Cluster::new("X", vec![0, 1])]), cells);
    let mut sink = RecordingSink::default();
    let options = SubsetOptions {
        include_children: true,
        create_subset_as_child: false,
    };

    let report = run(&mut host, TransformType::Extended, &[cells], Some(options), &mut sink).unwrap();
    let children = &report.created[0].artifacts.children;
    assert_eq!(children.len(), 3);
    assert_eq!(host.name_of(children[2]), host.name_of(sparse));
    assert!(host.partition(children[2]).unwrap().is_empty());

    // row 2 only belongs to cluster B
    let louvain = host.partition(children[1]).unwrap();
    assert_eq!(louvain.len(), 1);
    assert_eq!(louvain.clusters()[0].name(), "B");
    assert_eq!(louvain.clusters()[0].indices(), &[0]);
}

proptest! {
    #[test]
    fn prop_extended_subset_matches_selected_rows(selection in prop::collection::vec(0usize..5, 1..12)) {
        let Fixture { mut host, cells, louvain, .. } = fixture(selection.clone());
        let mut sink = RecordingSink::default();
        let options = SubsetOptions {
            include_children: true,
            create_subset_as_child: false,
        };

        let report = run(&mut host, TransformType::Extended, &[cells], Some(options), &mut sink).unwrap();
        let artifacts = &report.created[0].artifacts;

        let mut ordered = Vec::new();
        for row in selection {
            if !ordered.contains(&row) {
                ordered.push(row);
            }
        }

        let subset = host.points_data(artifacts.root).unwrap();
        prop_assert_eq!(subset.row_count(), ordered.len());
        let source = host.points_data(cells).unwrap();
        for (k, &row) in ordered.iter().enumerate() {
            prop_assert_eq!(subset.row(k).unwrap(), source.row(row).unwrap());
        }

        let source_clusters = host.partition(louvain).unwrap();
        for cluster in host.partition(artifacts.children[1]).unwrap() {
            let original = source_clusters.iter().find(|c| c.name() == cluster.name()).unwrap();
            for &i in cluster.indices() {
                prop_assert!(original.indices().contains(&(ordered[i as usize] as u32)));
            }
        }
    }
}
