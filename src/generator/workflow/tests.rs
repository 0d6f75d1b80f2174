use super::*;
use crate::config::CacheConfig;
use crate::generator::analysts::agents::analyst_creator::AnalystCreator;
use crate::generator::analysts::feedback::ScriptedFeedback;
use crate::generator::analysts::types::{Analyst, AnalystRequest, AnalystTeam};
use crate::generator::report::types::finalize_report;
use crate::generator::step_forward_agent::StepForwardAgent;
use crate::generator::test_support::{offline_config, offline_context, seed_reply};
use tempfile::TempDir;

fn create_test_config(temp_dir: &TempDir) -> Config {
    Config {
        topic: Some("Urban air mobility".to_string()),
        output_path: temp_dir.path().join("output"),
        internal_path: temp_dir.path().join(".deep-researcher"),
        skip_connection_check: true,
        cache: CacheConfig {
            enabled: false,
            cache_dir: temp_dir.path().join("cache"),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn analyst() -> Analyst {
    Analyst {
        affiliation: "City Hall".to_string(),
        name: "Mara".to_string(),
        role: "Planner".to_string(),
        description: "Noise and zoning".to_string(),
    }
}

async fn seed_state(config: &Config, stage: ResearchStage) -> ResearchState {
    let mut state = ResearchState::new("Urban air mobility", config.max_analysts);
    state.analysts = vec![analyst()];
    state.stage = stage;
    if stage == ResearchStage::ReportWritten {
        state.sections = vec!["## Zoning\nRooftops.".to_string()];
        state.report = Some(finalize_report(
            "# Air taxis\n## Introduction\nIntro",
            "## Insights\nBody",
            "## Conclusion\nEnd",
        ));
    }
    Checkpointer::new(config.checkpoint_dir())
        .save(&mut state)
        .await
        .unwrap();
    state
}

#[test]
fn test_timing_scope_accumulates_phases() {
    let mut timing = TimingScope::new();
    timing.start_phase(TimingKeys::ANALYSTS);
    assert!(timing.end_phase(TimingKeys::ANALYSTS).is_some());
    timing.start_phase(TimingKeys::ANALYSTS);
    timing.end_phase(TimingKeys::ANALYSTS);
    timing.start_phase(TimingKeys::REPORT);
    timing.end_phase(TimingKeys::REPORT);

    assert!(timing.end_phase("never-started").is_none());
    let phases: Vec<&str> = timing
        .get_phase_durations()
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(phases, vec![TimingKeys::ANALYSTS, TimingKeys::REPORT]);

    let report = timing.generate_timing_report();
    assert!(report.contains("总执行时间"));
    assert!(report.contains("- analysts:"));
}

#[tokio::test]
async fn test_review_routes_feedback() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&temp_dir);
    let state = ResearchState::new("t", 1);

    let provider = ScriptedFeedback::new(vec![
        "  add a pilot  ".to_string(),
        "continue".to_string(),
    ]);
    assert!(matches!(
        review_analysts(&config, &state, &provider).await.unwrap(),
        Review::Revise(text) if text == "add a pilot"
    ));
    assert!(matches!(
        review_analysts(&config, &state, &provider).await.unwrap(),
        Review::Approve
    ));
    // 队列耗尽且未要求中断时直接认可
    assert!(matches!(
        review_analysts(&config, &state, &provider).await.unwrap(),
        Review::Approve
    ));
}

#[tokio::test]
async fn test_review_interrupts_without_feedback() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        interrupt_before_feedback: true,
        ..create_test_config(&temp_dir)
    };
    let state = ResearchState::new("t", 1);

    let provider = ScriptedFeedback::new(Vec::new());
    assert!(matches!(
        review_analysts(&config, &state, &provider).await.unwrap(),
        Review::Interrupt
    ));
}

#[tokio::test]
async fn test_review_caps_feedback_rounds() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        max_feedback_rounds: 1,
        ..create_test_config(&temp_dir)
    };
    let mut state = ResearchState::new("t", 1);
    state.record_feedback("first revision");

    let provider = ScriptedFeedback::new(vec!["second revision".to_string()]);
    assert!(matches!(
        review_analysts(&config, &state, &provider).await.unwrap(),
        Review::Approve
    ));
}

#[tokio::test]
async fn test_run_interrupts_at_feedback_checkpoint() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config {
        interrupt_before_feedback: true,
        ..create_test_config(&temp_dir)
    };
    let seeded = seed_state(&config, ResearchStage::AwaitingFeedback).await;
    config.resume_thread = Some(seeded.thread_id.clone());

    let context = GeneratorContext::new(config.clone()).unwrap();
    let outcome = run(&context, &ScriptedFeedback::new(Vec::new()))
        .await
        .unwrap();

    assert_eq!(outcome, WorkflowOutcome::Interrupted(seeded.thread_id.clone()));
    let saved = Checkpointer::new(config.checkpoint_dir())
        .load(&seeded.thread_id)
        .await
        .unwrap();
    assert_eq!(saved.stage, ResearchStage::AwaitingFeedback);
}

#[tokio::test]
async fn test_run_resumes_finished_report_to_disk() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config {
        verbose: true,
        ..create_test_config(&temp_dir)
    };
    let seeded = seed_state(&config, ResearchStage::ReportWritten).await;
    config.resume_thread = Some(seeded.thread_id);

    let context = GeneratorContext::new(config.clone()).unwrap();
    let outcome = run(&context, &ScriptedFeedback::new(Vec::new()))
        .await
        .unwrap();

    let expected = config.output_path.join("Research-Report.md");
    assert_eq!(outcome, WorkflowOutcome::Completed(expected.clone()));
    let report = std::fs::read_to_string(expected).unwrap();
    assert!(report.contains("Body"));
}

#[tokio::test]
async fn test_run_rejects_unknown_thread() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        resume_thread: Some("missing-thread".to_string()),
        ..create_test_config(&temp_dir)
    };
    seed_state(&config, ResearchStage::AwaitingFeedback).await;

    let context = GeneratorContext::new(config).unwrap();
    let err = run(&context, &ScriptedFeedback::new(Vec::new()))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("missing-thread"));
}

fn analyst_request(feedback: Option<&str>) -> AnalystRequest {
    AnalystRequest {
        topic: "Urban air mobility".to_string(),
        max_analysts: 2,
        human_feedback: feedback.map(str::to_string),
    }
}

#[tokio::test]
async fn test_feedback_round_regenerates_analysts() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        max_analysts: 2,
        interrupt_before_feedback: true,
        ..offline_config(&temp_dir)
    };
    let context = offline_context(config.clone(), Vec::new(), Vec::new());

    let regulator = Analyst {
        affiliation: "Aviation Authority".to_string(),
        name: "Odile".to_string(),
        role: "Regulator".to_string(),
        description: "Certification of eVTOL aircraft".to_string(),
    };
    let first_team = AnalystTeam {
        analysts: vec![analyst()],
    };
    let revised_team = AnalystTeam {
        analysts: vec![analyst(), regulator],
    };
    seed_reply(&context, &AnalystCreator, &analyst_request(None), &first_team).await;
    seed_reply(
        &context,
        &AnalystCreator,
        &analyst_request(Some("add a regulator")),
        &revised_team,
    )
    .await;

    let (params, _) = AnalystCreator.execute_params(&context, &analyst_request(Some("add a regulator")));
    assert!(params.prompt_sys.contains("add a regulator"));

    let feedback = ScriptedFeedback::new(vec!["add a regulator".to_string()]);
    let outcome = run(&context, &feedback).await.unwrap();
    let WorkflowOutcome::Interrupted(thread_id) = outcome else {
        panic!("expected an interrupted run, got {:?}", outcome);
    };

    let saved = Checkpointer::new(config.checkpoint_dir())
        .load(&thread_id)
        .await
        .unwrap();
    assert_eq!(saved.stage, ResearchStage::AwaitingFeedback);
    assert_eq!(saved.analysts, revised_team.analysts);
    assert_eq!(saved.feedback_history, vec!["add a regulator".to_string()]);
    assert_eq!(saved.feedback_rounds, 1);
    assert!(saved.pending_feedback.is_none());
}
