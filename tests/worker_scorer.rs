//! Running a scorer on a worker thread

use syntaxdecoder::{
    Error, Worker,
    models::{ArcRelocate, ArcRelocateTransition},
    ports::ActionsScorer,
    runners::SyntaxDecoder,
    transition::{Action, ExtendedState, Transition},
};

/// Sends the priorities of every step to a worker that turns them into scores.
struct RemoteScorer {
    worker: Worker<Vec<u32>, Vec<f64>>,
    requests: usize,
}

impl RemoteScorer {
    fn spawn() -> syntaxdecoder::Result<Self> {
        let worker = Worker::spawn("remote-scorer", |priorities: Vec<u32>| {
            // prefer arcs, then relocation, then shifting
            priorities.into_iter().map(|p| p as f64).collect()
        })?;
        Ok(Self {
            worker,
            requests: 0,
        })
    }
}

impl ActionsScorer<ArcRelocateTransition, ()> for RemoteScorer {
    fn score(
        &mut self,
        actions: &mut [Action<ArcRelocateTransition>],
        _extended_state: &ExtendedState<ArcRelocateTransition, ()>,
    ) -> syntaxdecoder::Result<()> {
        self.worker
            .write(actions.iter().map(|action| action.transition.priority()).collect())?;
        let scores = self.worker.read()?;
        for (action, score) in actions.iter_mut().zip(scores) {
            action.score = score;
        }
        self.requests += 1;
        Ok(())
    }
}

#[test_log::test]
fn decoder_scores_through_a_worker() {
    let mut decoder = SyntaxDecoder::new(ArcRelocate, RemoteScorer::spawn().unwrap());

    let tree = decoder.decode(&[0, 1, 2, 3], ()).unwrap();

    assert!(tree.is_complete());
    assert!(!tree.has_cycle());
    assert_eq!(tree.roots().len(), 1);
    assert!(decoder.scorer().requests > 0);
    assert_eq!(decoder.scorer().worker.name(), "remote-scorer");
}

#[test_log::test]
fn stopped_worker_aborts_the_derivation() {
    let mut scorer = RemoteScorer::spawn().unwrap();
    scorer.worker.stop().unwrap();
    let mut decoder = SyntaxDecoder::new(ArcRelocate, scorer);

    assert!(matches!(
        decoder.decode(&[0, 1], ()),
        Err(Error::WorkerDisconnected { .. })
    ));
}
