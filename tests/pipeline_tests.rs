//! Tests for the multi-epoch training pipeline and its observers

mod common;

use std::{
    fs,
    sync::{Arc, Mutex},
};

use syntaxdecoder::{
    DependencyTree, Result,
    helpers::OracleScorer,
    models::{ArcRelocate, ArcRelocateOracleFactory},
    pipeline::{
        JsonlObserver, MetricsObserver, Observation, Observer, ProgressObserver, TrainingConfig,
        TrainingExample, TrainingPipeline, TrainingResult,
    },
    ports::StepRecord,
    runners::ActionsScorerTrainer,
    syntax::AttachmentScore,
};

use common::{ConstantScorer, non_projective_gold, projective_gold, wide_projective_gold};

fn examples() -> Vec<TrainingExample<()>> {
    [projective_gold(), wide_projective_gold(), non_projective_gold()]
        .into_iter()
        .map(|gold| TrainingExample::new(gold, ()))
        .collect()
}

fn oracle_trainer() -> ActionsScorerTrainer<ArcRelocate, OracleScorer, ()> {
    ActionsScorerTrainer::new(
        ArcRelocate,
        OracleScorer::default(),
        Box::new(ArcRelocateOracleFactory),
    )
}

/// Records the order of observer events.
#[derive(Clone, Default)]
struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl Observer for EventLog {
    fn on_training_start(&mut self, total_examples: usize, epochs: usize) -> Result<()> {
        self.push(format!("start {total_examples}x{epochs}"));
        Ok(())
    }

    fn on_epoch_start(&mut self, epoch: usize) -> Result<()> {
        self.push(format!("epoch {epoch}"));
        Ok(())
    }

    fn on_example_start(&mut self, _epoch: usize, example: usize) -> Result<()> {
        self.push(format!("example {example}"));
        Ok(())
    }

    fn on_step(&mut self, record: &StepRecord) -> Result<()> {
        self.push(format!("step {}", record.step));
        Ok(())
    }

    fn on_example_end(
        &mut self,
        _epoch: usize,
        example: usize,
        predicted: &DependencyTree,
        gold: &DependencyTree,
    ) -> Result<()> {
        let score = predicted.attachment_score(gold)?;
        self.push(format!("end {example} {}", score.unlabeled_correct));
        Ok(())
    }

    fn on_epoch_end(&mut self, epoch: usize, score: &AttachmentScore) -> Result<()> {
        self.push(format!("epoch end {epoch} {}", score.total));
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.push("done".to_string());
        Ok(())
    }
}

#[test]
fn oracle_replay_is_perfect_for_arc_relocate() {
    let mut trainer = oracle_trainer();
    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        epochs: 2,
        seed: Some(42),
        shuffle: true,
        propagate_to_input: false,
    });

    let result = pipeline.run(&mut trainer, &examples()).unwrap();

    assert_eq!(result.epochs, 2);
    assert_eq!(result.examples, 3);
    assert_eq!(result.relevant_steps, 0);
    for score in &result.epoch_scores {
        assert_eq!(score.total, 15);
        assert_eq!(score.uas(), 1.0);
    }
}

#[test]
fn observers_see_events_in_order() {
    let log = EventLog::default();
    let mut trainer = oracle_trainer();
    let mut pipeline = TrainingPipeline::new(TrainingConfig::default())
        .with_observer(Box::new(log.clone()));

    let gold = DependencyTree::from_heads(&[0, 1], &[Some(1), None], None).unwrap();
    pipeline
        .run(&mut trainer, &[TrainingExample::new(gold, ())])
        .unwrap();

    // shift, shift, arc-left, root
    assert_eq!(
        log.events(),
        vec![
            "start 1x1",
            "epoch 0",
            "example 0",
            "step 0",
            "step 1",
            "step 2",
            "step 3",
            "end 0 2",
            "epoch end 0 2",
            "done",
        ]
    );
}

#[test]
fn same_seed_gives_same_order() {
    let run = |seed| {
        let log = EventLog::default();
        let mut trainer = oracle_trainer();
        let mut pipeline = TrainingPipeline::new(TrainingConfig {
            epochs: 3,
            seed: Some(seed),
            shuffle: true,
            propagate_to_input: false,
        })
        .with_observer(Box::new(log.clone()));
        pipeline.run(&mut trainer, &examples()).unwrap();
        log.events()
            .into_iter()
            .filter(|event| event.starts_with("example"))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(7), run(7));
}

#[test]
fn jsonl_observer_writes_one_line_per_derivation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("observations.jsonl");

    let mut trainer = oracle_trainer();
    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        epochs: 2,
        ..TrainingConfig::default()
    })
    .with_observer(Box::new(JsonlObserver::new(&path).unwrap()));
    pipeline.run(&mut trainer, &examples()).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let observations: Vec<Observation> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(observations.len(), 6);
    for observation in &observations {
        assert!(!observation.steps.is_empty());
        assert_eq!(observation.unlabeled_correct, observation.total);
        assert!(observation.steps.iter().all(|step| step.correct));
        assert!(
            observation
                .steps
                .iter()
                .all(|step| step.example == observation.example && step.error.is_none())
        );
    }
    assert_eq!(observations[0].epoch, 0);
    assert_eq!(observations[5].epoch, 1);
}

#[test]
fn metrics_observer_counts_disagreements() {
    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));

    struct Shared(Arc<Mutex<MetricsObserver>>);
    impl Observer for Shared {
        fn on_example_start(&mut self, epoch: usize, example: usize) -> Result<()> {
            self.0.lock().unwrap().on_example_start(epoch, example)
        }
        fn on_step(&mut self, record: &StepRecord) -> Result<()> {
            self.0.lock().unwrap().on_step(record)
        }
        fn on_epoch_end(&mut self, epoch: usize, score: &AttachmentScore) -> Result<()> {
            self.0.lock().unwrap().on_epoch_end(epoch, score)
        }
    }

    let mut trainer = ActionsScorerTrainer::new(
        ArcRelocate,
        ConstantScorer::default(),
        Box::new(ArcRelocateOracleFactory),
    );
    let mut pipeline = TrainingPipeline::new(TrainingConfig::default())
        .with_observer(Box::new(Shared(Arc::clone(&metrics))));
    let result = pipeline.run(&mut trainer, &examples()).unwrap();

    let summary = metrics.lock().unwrap().summary();
    assert_eq!(summary.epochs, 1);
    assert_eq!(summary.derivations, 3);
    assert!(summary.oracle_agreement < 1.0);
    assert_eq!(
        summary.avg_derivation_length,
        result.steps as f64 / 3.0
    );
    assert!(result.relevant_steps > 0);
}

#[test]
fn training_result_survives_a_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("result.json");

    let mut trainer = oracle_trainer();
    let result = TrainingPipeline::new(TrainingConfig::default())
        .run(&mut trainer, &examples())
        .unwrap();
    result.save(&path).unwrap();

    assert_eq!(TrainingResult::load(&path).unwrap(), result);
}

#[test]
fn progress_observer_follows_the_run() {
    let mut trainer = oracle_trainer();
    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        epochs: 2,
        ..TrainingConfig::default()
    })
    .with_observer(Box::new(ProgressObserver::new()));

    let result = pipeline.run(&mut trainer, &examples()).unwrap();
    assert_eq!(result.final_score().uas(), 1.0);
}
