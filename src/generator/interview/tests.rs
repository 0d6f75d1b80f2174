use super::*;
use crate::config::Config;
use crate::generator::interview::types::{FAREWELL_PHRASE, SearchQuery};
use crate::generator::search::{SearchDocument, format_documents};
use crate::generator::test_support::{offline_config, offline_context, seed_reply};
use tempfile::TempDir;

const TOPIC: &str = "Urban air mobility";

fn analyst() -> Analyst {
    Analyst {
        affiliation: "City Hall".to_string(),
        name: "Mara".to_string(),
        role: "Planner".to_string(),
        description: "Noise and zoning".to_string(),
    }
}

fn web_docs() -> Vec<SearchDocument> {
    vec![SearchDocument::web("https://news.example/vertiports", "Vertiports on rooftops")]
}

fn wiki_docs() -> Vec<SearchDocument> {
    vec![SearchDocument::wiki(
        "https://en.wikipedia.org/wiki/Air_taxi",
        "Air taxi",
        "An air taxi is a small commercial aircraft",
    )]
}

fn offline(temp_dir: &TempDir, max_num_turns: usize) -> GeneratorContext {
    let config = Config {
        max_num_turns,
        ..offline_config(temp_dir)
    };
    offline_context(config, web_docs(), wiki_docs())
}

/// 按访谈推进顺序预置一轮问答的全部回复，并同步推进预期状态
async fn seed_turn(context: &GeneratorContext, expected: &mut InterviewState, question: &str, answer: &str) {
    seed_reply(context, &QuestionAsker, expected, &question.to_string()).await;
    expected.messages.push(InterviewMessage::ai(question));

    let query = SearchQuery {
        search_query: "vertiport zoning".to_string(),
    };
    seed_reply(context, &SearchQueryWriter::new(SearchTarget::Web), expected, &query).await;
    seed_reply(
        context,
        &SearchQueryWriter::new(SearchTarget::KnowledgeBase),
        expected,
        &query,
    )
    .await;
    expected.context.push(format_documents(&web_docs()));
    expected.context.push(format_documents(&wiki_docs()));

    seed_reply(context, &ExpertAnswerer, expected, &answer.to_string()).await;
    expected.messages.push(InterviewMessage::expert(answer));
}

async fn seed_section(context: &GeneratorContext, expected: &mut InterviewState, section: &str) {
    save_interview(expected);
    seed_reply(context, &SectionWriter, expected, &section.to_string()).await;
    expected.sections.push(section.to_string());
}

#[tokio::test]
async fn test_interview_stops_at_turn_limit() {
    let temp_dir = TempDir::new().unwrap();
    let context = offline(&temp_dir, 2);

    let mut expected = InterviewState::new(analyst(), TOPIC, 2);
    seed_turn(&context, &mut expected, "Where do vertiports go?", "On rooftops [1].").await;
    seed_turn(&context, &mut expected, "Who approves them?", "The city council [2].").await;
    seed_section(&context, &mut expected, "## Rooftop vertiports\nZoning decides [1].").await;

    let state = conduct_interview(&context, TOPIC, &analyst()).await.unwrap();

    assert_eq!(state.expert_turns(), 2);
    assert_eq!(state.messages.len(), 5);
    assert_eq!(state.context.len(), 4);
    assert_eq!(
        state.sections,
        vec!["## Rooftop vertiports\nZoning decides [1].".to_string()]
    );
    assert!(state.interview.contains("The city council [2]."));
    assert_eq!(state, expected);
}

#[tokio::test]
async fn test_interview_ends_on_farewell() {
    let temp_dir = TempDir::new().unwrap();
    let context = offline(&temp_dir, 5);

    let farewell = format!("{}!", FAREWELL_PHRASE);
    let mut expected = InterviewState::new(analyst(), TOPIC, 5);
    seed_turn(&context, &mut expected, &farewell, "You are welcome.").await;
    seed_section(&context, &mut expected, "## Wrap-up\nShort.").await;

    let state = conduct_interview(&context, TOPIC, &analyst()).await.unwrap();

    assert_eq!(state.expert_turns(), 1);
    assert_eq!(state.messages.len(), 3);
    assert_eq!(state.sections, vec!["## Wrap-up\nShort.".to_string()]);
}

#[tokio::test]
async fn test_blank_search_query_yields_empty_context() {
    let temp_dir = TempDir::new().unwrap();
    let context = offline(&temp_dir, 2);

    let mut state = InterviewState::new(analyst(), TOPIC, 2);
    state.messages.push(InterviewMessage::ai("What about noise?"));
    seed_reply(
        &context,
        &SearchQueryWriter::new(SearchTarget::Web),
        &state,
        &SearchQuery::default(),
    )
    .await;
    seed_reply(
        &context,
        &SearchQueryWriter::new(SearchTarget::KnowledgeBase),
        &state,
        &SearchQuery {
            search_query: "   ".to_string(),
        },
    )
    .await;

    assert_eq!(search_web(&context, &state).await.unwrap(), "");
    assert_eq!(search_wikipedia(&context, &state).await.unwrap(), "");
}
