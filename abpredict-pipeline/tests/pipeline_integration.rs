//! End-to-end runs of the pipeline stages against mock collaborators

use abpredict_core::{AbpredictError, CachePolicy, Config};
use abpredict_pipeline::{
    Collaborators, ComparisonTask, Genome, Orchestrator, PipelineError, ResultCache, Stage,
    StageSummary, TaskStatus,
};
use abpredict_tools::{
    MockClusterAligner, MockFunctionPredictor, MockLocalSearch, MockMarkerCaller,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

const HEADER: &str = "ORF_ID\tContig\tPredicted_Protein\tAMR Gene Family\tID\n";

fn table(contig: &str, protein: &str) -> String {
    format!("{}orf1\t{}\t{}\tfam\t{}\n", HEADER, contig, protein, contig)
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

struct Layout {
    _root: TempDir,
    data: PathBuf,
    out: PathBuf,
    genomes: Vec<Genome>,
}

/// `n_bgcs` cluster files and one query marker file per genome
fn layout(genome_ids: &[&str], n_bgcs: usize) -> Layout {
    let root = TempDir::new().unwrap();
    let data = root.path().join("data");
    let mut genomes = Vec::new();

    for id in genome_ids {
        let assembly = root.path().join("genomes").join(format!("{}.fna", id));
        write(&assembly, ">c1\nACGT\n");
        genomes.push(Genome::from_path(assembly));

        write(&data.join(id).join("antismash").join(format!("{}.gbk", id)), "LOCUS");
        for i in 1..=n_bgcs {
            write(
                &data.join(id).join("antismash").join(format!("region{:03}.gbk", i)),
                "LOCUS",
            );
        }
        write(
            &data.join(id).join("rgi").join("region001.txt"),
            &table(&format!("{}_contig", id), "MKTAYIAKQRQISFVKSHFSRQ"),
        );
    }

    Layout {
        out: root.path().join("out"),
        data,
        genomes,
        _root: root,
    }
}

struct Mocks {
    caller: Arc<MockMarkerCaller>,
    search: Arc<MockLocalSearch>,
    aligner: Arc<MockClusterAligner>,
    predictor: Arc<MockFunctionPredictor>,
}

impl Mocks {
    fn new(aligner: MockClusterAligner) -> Self {
        Self {
            caller: Arc::new(
                MockMarkerCaller::new(table("X_contig", "WWWWWWWW"))
                    .with_genome_table("A", table("A_contig", "MKTAYIAKQRQISFVKSHFSRQ"))
                    .with_genome_table("B", table("B_contig", "MKSAYIAKQRQISFVKSHFSRQ")),
            ),
            search: Arc::new(MockLocalSearch::every_target(1e-20, 80.0)),
            aligner: Arc::new(aligner),
            predictor: Arc::new(MockFunctionPredictor::new()),
        }
    }

    fn collaborators(&self) -> Collaborators {
        Collaborators {
            marker_caller: self.caller.clone(),
            search: self.search.clone(),
            cluster_aligner: self.aligner.clone(),
            function_predictor: self.predictor.clone(),
        }
    }
}

fn config() -> Config {
    let mut config = Config::default();
    config.pipeline.ncpus = 2;
    config.pipeline.family_filter = false;
    config
}

#[test]
fn test_two_genome_end_to_end() {
    let layout = layout(&["A", "B"], 1);
    let mocks = Mocks::new(MockClusterAligner::with_similarity(0.42));
    let orchestrator =
        Orchestrator::new(config(), &layout.out, mocks.collaborators()).unwrap();

    let summary = orchestrator.run(&layout.data, &layout.genomes).unwrap();

    assert_eq!(summary.markers, StageSummary { completed: 2, skipped: 0 });
    assert_eq!(summary.cluster_alignment.completed, 2);
    assert_eq!(summary.marker_alignment.completed, 2);

    assert!(layout.out.join("A/markers/A.txt").exists());

    let cluster_csv = layout
        .out
        .join("A/cluster_alignment/region001__B__region001/region001_cluster_similarity.csv");
    assert_eq!(
        fs::read_to_string(cluster_csv).unwrap(),
        "source_bgc,target_bgc,cluster_similarity\nregion001,region001,0.42\n"
    );

    let csv_path = layout
        .out
        .join("A/marker_alignment/region001__B/region001_alignment.csv");
    let mut rdr = csv::Reader::from_path(&csv_path).unwrap();
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "A_contig");
    assert_eq!(&rows[0][1], "B_contig");
    let score: f64 = rows[0][3].parse().unwrap();
    assert!(score > 0.0);
}

#[test]
fn test_second_run_skips_everything() {
    let layout = layout(&["A", "B"], 1);
    let mocks = Mocks::new(MockClusterAligner::with_similarity(0.42));
    let orchestrator =
        Orchestrator::new(config(), &layout.out, mocks.collaborators()).unwrap();

    orchestrator.run(&layout.data, &layout.genomes).unwrap();
    let calls = (mocks.caller.calls(), mocks.aligner.calls(), mocks.search.calls());

    let summary = orchestrator.run(&layout.data, &layout.genomes).unwrap();

    assert_eq!(summary.markers, StageSummary { completed: 0, skipped: 2 });
    assert_eq!(summary.cluster_alignment, StageSummary { completed: 0, skipped: 2 });
    assert_eq!(summary.marker_alignment, StageSummary { completed: 0, skipped: 2 });
    assert_eq!(
        (mocks.caller.calls(), mocks.aligner.calls(), mocks.search.calls()),
        calls
    );
}

#[test]
fn test_cluster_fan_out_three_genomes() {
    let layout = layout(&["g1", "g2", "g3"], 2);
    let mocks = Mocks::new(MockClusterAligner::with_similarity(0.1));
    let orchestrator =
        Orchestrator::new(config(), &layout.out, mocks.collaborators()).unwrap();

    let summary = orchestrator.run(&layout.data, &layout.genomes).unwrap();

    assert_eq!(summary.cluster_alignment.completed, 24);
    for genome in ["g1", "g2", "g3"] {
        let dirs = fs::read_dir(layout.out.join(genome).join("cluster_alignment"))
            .unwrap()
            .count();
        assert_eq!(dirs, 8);
    }
}

#[test]
fn test_failed_stage_stops_pipeline_and_recovers() {
    let layout = layout(&["A", "B"], 1);
    let failing = Mocks::new(MockClusterAligner::failing());
    let orchestrator =
        Orchestrator::new(config(), &layout.out, failing.collaborators()).unwrap();

    let err = orchestrator.run(&layout.data, &layout.genomes).unwrap_err();
    match err {
        PipelineError::StageFailed { stage, total, failed } => {
            assert_eq!(stage, Stage::ClusterAlignment);
            assert_eq!(total, 2);
            assert_eq!(failed.len(), 2);
        }
        other => panic!("Expected StageFailed, got {:?}", other),
    }
    // Marker alignment never started
    assert_eq!(failing.search.calls(), 0);

    let task_dir = layout
        .out
        .join("A/cluster_alignment/region001__B__region001");
    let cache = ResultCache::new(CachePolicy::Status);
    assert_eq!(cache.status_of(&task_dir), TaskStatus::Failed);

    // A fixed tool re-runs only the failed tasks
    let fixed = Mocks::new(MockClusterAligner::with_similarity(0.5));
    let orchestrator =
        Orchestrator::new(config(), &layout.out, fixed.collaborators()).unwrap();
    let summary = orchestrator.run(&layout.data, &layout.genomes).unwrap();

    assert_eq!(summary.markers.skipped, 2);
    assert_eq!(summary.cluster_alignment.completed, 2);
    assert_eq!(fixed.caller.calls(), 0);
    assert_eq!(cache.status_of(&task_dir), TaskStatus::Done);
}

#[test]
fn test_existence_policy_skips_any_directory() {
    let layout = layout(&["A", "B"], 1);
    // A leftover directory from an interrupted run
    fs::create_dir_all(layout.out.join("A/markers")).unwrap();

    let mut config = config();
    config.pipeline.cache_policy = CachePolicy::Existence;
    let mocks = Mocks::new(MockClusterAligner::with_similarity(0.5));
    let orchestrator =
        Orchestrator::new(config, &layout.out, mocks.collaborators()).unwrap();

    let result = orchestrator.run(&layout.data, &layout.genomes);

    // A's table was never written, so B's alignment against it fails
    assert!(matches!(
        result,
        Err(PipelineError::StageFailed { stage: Stage::MarkerAlignment, .. })
    ));
    assert_eq!(mocks.caller.calls(), 1);
}

#[test]
fn test_missing_inputs_fail_before_scheduling() {
    let layout = layout(&["A", "B"], 1);
    let mocks = Mocks::new(MockClusterAligner::with_similarity(0.5));
    let orchestrator =
        Orchestrator::new(config(), &layout.out, mocks.collaborators()).unwrap();

    let err = orchestrator
        .run(&layout.data.join("missing"), &layout.genomes)
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Core(AbpredictError::InputMissing(_))
    ));
    assert_eq!(mocks.caller.calls(), 0);
    assert!(!layout.out.exists());
}

#[test]
fn test_invalid_concurrency_is_config_error() {
    let layout = layout(&["A"], 1);
    let mut config = config();
    config.pipeline.ncpus = 0;
    let mocks = Mocks::new(MockClusterAligner::with_similarity(0.5));

    let result = Orchestrator::new(config, &layout.out, mocks.collaborators());

    assert!(matches!(
        result,
        Err(PipelineError::Core(AbpredictError::Configuration(_)))
    ));
}

#[test]
fn test_function_prediction_per_genome() {
    let layout = layout(&["A", "B", "C"], 1);
    let mut config = config();
    config.pipeline.no_ssn = true;
    let mocks = Mocks::new(MockClusterAligner::with_similarity(0.5));
    let orchestrator = Orchestrator::new(config, &layout.out, mocks.collaborators()).unwrap();

    let summary = orchestrator.predict_functions(&layout.genomes).unwrap();

    assert_eq!(summary, StageSummary { completed: 3, skipped: 0 });
    assert_eq!(mocks.predictor.calls(), 3);
    assert!(mocks.predictor.saw_no_ssn());
    assert_eq!(
        fs::read_to_string(layout.out.join("B/function_prediction/prediction.txt")).unwrap(),
        "B\tno_ssn=true\n"
    );
    // The comparison stages are not involved
    assert_eq!(mocks.caller.calls(), 0);

    let summary = orchestrator.predict_functions(&layout.genomes).unwrap();
    assert_eq!(summary, StageSummary { completed: 0, skipped: 3 });
    assert_eq!(mocks.predictor.calls(), 3);
}

#[test]
fn test_failed_prediction_is_recorded() {
    let layout = layout(&["A"], 1);
    let mut mocks = Mocks::new(MockClusterAligner::with_similarity(0.5));
    mocks.predictor = Arc::new(MockFunctionPredictor::failing());
    let orchestrator = Orchestrator::new(config(), &layout.out, mocks.collaborators()).unwrap();

    let err = orchestrator.predict_functions(&layout.genomes).unwrap_err();

    assert!(matches!(
        err,
        PipelineError::StageFailed { stage: Stage::FunctionPrediction, .. }
    ));
    let cache = ResultCache::new(CachePolicy::Status);
    assert_eq!(
        cache.status_of(&layout.out.join("A/function_prediction")),
        TaskStatus::Failed
    );
}

#[test]
fn test_unwritable_task_directory_fails_without_panicking() {
    let layout = layout(&["A"], 1);
    // A regular file where the genome directory should be
    let blocker = layout.out.join("A");
    write(&blocker, "not a directory");
    let mocks = Mocks::new(MockClusterAligner::with_similarity(0.5));
    let orchestrator = Orchestrator::new(config(), &layout.out, mocks.collaborators()).unwrap();

    let task = ComparisonTask {
        stage: Stage::Markers,
        query: layout.genomes[0].path.clone(),
        target: None,
        target_label: String::new(),
        output_dir: blocker.join("markers"),
        progress: 100.0,
    };
    let outcome = orchestrator.execute(&task);

    assert!(outcome.is_failed());
    assert_eq!(mocks.caller.calls(), 0);
    assert!(fs::metadata(&blocker).unwrap().is_file());
}
