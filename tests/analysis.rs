use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use ndarray::{Array1, ArrayView1};
use safesip::{
    inference::{artifact, Capability, Scaler},
    presenter::percent,
    Artifact, FeatureVector, InferencePipeline, Label, ModelError, NavAction, Phase,
    PotabilityError, Report, SessionState, Verdict, NUM_PARAMS,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn forest_pipeline() -> InferencePipeline {
    InferencePipeline::load(
        fixture("random_forest_model.json"),
        fixture("standard_scaler.json"),
    )
}

/// Walks a fresh session through every step, applying `edit` at each one, and submits.
fn submitted(mut edit: impl FnMut(&mut SessionState)) -> SessionState {
    let mut session = SessionState::new();
    loop {
        edit(&mut session);
        if session.can(NavAction::Submit) {
            session.submit().unwrap();
            return session;
        }
        session.advance().unwrap();
    }
}

/// Identity scaler that remembers every vector it was handed.
#[derive(Debug, Default, Clone)]
struct Recording {
    seen: Arc<Mutex<Vec<Vec<f64>>>>,
}

impl Scaler for Recording {
    fn n_features(&self) -> usize {
        NUM_PARAMS
    }

    fn transform(&self, x: ArrayView1<f64>) -> Result<Array1<f64>, ModelError> {
        self.seen.lock().unwrap().push(x.to_vec());
        Ok(x.to_owned())
    }
}

#[test]
fn defaults_reach_the_scaler_in_feature_order() {
    init_logger();

    let session = submitted(|_| {});
    assert_eq!(session.phase(), Phase::Results);

    let recording = Recording::default();
    let model = artifact::load_model(fixture("random_forest_model.json")).unwrap();
    let pipeline = InferencePipeline::new(model, Box::new(recording.clone()));
    Report::build(&session, &pipeline);

    let seen = recording.seen.lock().unwrap();
    assert_eq!(
        *seen,
        [vec![7.0, 150.0, 20000.0, 7.0, 300.0, 400.0, 15.0, 60.0, 4.0]]
    );
}

#[test]
fn forest_fixture_predicts_potable_for_defaults() {
    init_logger();

    let pipeline = forest_pipeline();
    assert!(pipeline.is_ready());
    assert_eq!(pipeline.capability(), Some(Capability::Probability));

    let report = Report::build(&submitted(|_| {}), &pipeline);
    let verdict = report.outcome.unwrap();
    assert_eq!(verdict.title(), "Potable");
    assert_eq!(verdict.confidence().map(percent).as_deref(), Some("72.50%"));
}

#[test]
fn forest_fixture_flags_acidic_water() {
    init_logger();

    let session = submitted(|s| {
        if s.step() == 1 {
            s.commit_text("3.0").unwrap();
        }
    });

    let report = Report::build(&session, &forest_pipeline());
    assert_eq!(
        report.outcome.as_ref().map(Verdict::confidence_line),
        Ok(Some("Model Confidence: 57.86% Non-Potable".to_string()))
    );
    assert_eq!(report.summary[0].value, "3.0");
}

#[test]
fn label_only_model_reports_without_confidence() {
    init_logger();

    let pipeline = InferencePipeline::load(
        fixture("linear_svm_model.json"),
        fixture("standard_scaler.json"),
    );
    assert_eq!(pipeline.capability(), Some(Capability::LabelOnly));

    let report = Report::build(&submitted(|_| {}), &pipeline);
    assert_eq!(
        report.outcome,
        Ok(Verdict::NonPotable { confidence: None })
    );
    assert!(report.messages().is_empty());
}

#[test]
fn missing_model_keeps_the_form_working() {
    init_logger();

    let pipeline = InferencePipeline::load(
        fixture("no_such_model.json"),
        fixture("standard_scaler.json"),
    );
    assert!(!pipeline.is_ready());
    assert!(matches!(
        pipeline.load_errors().as_slice(),
        [PotabilityError::ArtifactMissing {
            artifact: Artifact::Model,
            ..
        }]
    ));

    let mut session = submitted(|s| {
        s.nudge(2).unwrap();
    });
    let features = FeatureVector::assemble(&session);
    assert!(!features.is_incomplete());

    let report = Report::build(&session, &pipeline);
    assert!(matches!(
        report.outcome,
        Err(PotabilityError::ArtifactMissing {
            artifact: Artifact::Model,
            ..
        })
    ));
    assert!(!report.messages().is_empty());

    session.restart().unwrap();
    assert_eq!(session, SessionState::new());
}

#[test]
fn cleared_parameter_blocks_inference() {
    init_logger();

    let recording = Recording::default();
    let model = artifact::load_model(fixture("random_forest_model.json")).unwrap();
    let pipeline = InferencePipeline::new(model, Box::new(recording.clone()));

    let session = submitted(|s| {
        if s.step() == 5 {
            s.clear().unwrap();
        }
    });

    let report = Report::build(&session, &pipeline);
    assert_eq!(
        report.outcome,
        Err(PotabilityError::IncompleteInput {
            missing: vec!["Sulfate"]
        })
    );
    assert_eq!(report.summary[4].value, "N/A");
    assert!(recording.seen.lock().unwrap().is_empty());
}

#[test]
fn previous_four_then_next_four_returns_to_step_five() {
    let mut session = SessionState::new();
    for _ in 0..4 {
        session.advance().unwrap();
    }
    assert_eq!(session.step(), 5);

    for _ in 0..4 {
        session.retreat().unwrap();
    }
    for _ in 0..4 {
        session.advance().unwrap();
    }
    assert_eq!(session.step(), 5);
}

#[test]
fn sessions_share_one_pipeline() {
    init_logger();

    let pipeline = forest_pipeline();

    let labels = std::thread::scope(|scope| {
        let acidic = scope.spawn(|| {
            let session = submitted(|s| {
                if s.step() == 1 {
                    s.jump_to_min().unwrap();
                }
            });
            pipeline.run(&FeatureVector::assemble(&session)).map(|p| p.label)
        });
        let neutral = scope.spawn(|| {
            let session = submitted(|_| {});
            pipeline.run(&FeatureVector::assemble(&session)).map(|p| p.label)
        });

        (acidic.join().unwrap(), neutral.join().unwrap())
    });

    assert_eq!(labels, (Ok(Label::NonPotable), Ok(Label::Potable)));
}
