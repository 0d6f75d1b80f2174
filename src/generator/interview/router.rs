use crate::generator::interview::types::{FAREWELL_PHRASE, InterviewMessage};

/// 每轮问答结束后的流向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewRoute {
    AskQuestion,
    SaveInterview,
}

/// 判断访谈是否结束：专家回答达到上限，或上一个问题是致谢语
pub fn route_messages(messages: &[InterviewMessage], max_num_turns: usize, name: &str) -> InterviewRoute {
    let num_responses = messages.iter().filter(|m| m.is_ai_named(name)).count();
    if num_responses >= max_num_turns {
        return InterviewRoute::SaveInterview;
    }

    // 路由发生在一问一答之后，倒数第二条即分析师最后的提问
    if messages.len() < 2 {
        return InterviewRoute::AskQuestion;
    }
    let last_question = &messages[messages.len() - 2];
    if last_question.content.contains(FAREWELL_PHRASE) {
        return InterviewRoute::SaveInterview;
    }

    InterviewRoute::AskQuestion
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::interview::types::EXPERT_NAME;

    fn exchange(turns: usize) -> Vec<InterviewMessage> {
        let mut messages = vec![InterviewMessage::human("Opening")];
        for i in 0..turns {
            messages.push(InterviewMessage::ai(format!("question {}", i)));
            messages.push(InterviewMessage::expert(format!("answer {}", i)));
        }
        messages
    }

    #[test]
    fn test_saves_when_turn_limit_reached() {
        assert_eq!(
            route_messages(&exchange(2), 2, EXPERT_NAME),
            InterviewRoute::SaveInterview
        );
        assert_eq!(
            route_messages(&exchange(3), 2, EXPERT_NAME),
            InterviewRoute::SaveInterview
        );
    }

    #[test]
    fn test_continues_below_turn_limit() {
        assert_eq!(
            route_messages(&exchange(1), 2, EXPERT_NAME),
            InterviewRoute::AskQuestion
        );
    }

    #[test]
    fn test_saves_on_farewell_question() {
        let mut messages = exchange(1);
        messages.push(InterviewMessage::ai(
            "Thank you so much for your help, that covers it!",
        ));
        messages.push(InterviewMessage::expert("You're welcome."));
        assert_eq!(
            route_messages(&messages, 5, EXPERT_NAME),
            InterviewRoute::SaveInterview
        );
    }

    #[test]
    fn test_farewell_only_checked_in_second_to_last_message() {
        let mut messages = exchange(0);
        messages.push(InterviewMessage::ai("What next?"));
        messages.push(InterviewMessage::expert(
            "Thank you so much for your help is what you might say.",
        ));
        assert_eq!(
            route_messages(&messages, 5, EXPERT_NAME),
            InterviewRoute::AskQuestion
        );
    }

    #[test]
    fn test_short_transcript_asks_question() {
        assert_eq!(
            route_messages(&exchange(0), 2, EXPERT_NAME),
            InterviewRoute::AskQuestion
        );
        assert_eq!(route_messages(&[], 2, EXPERT_NAME), InterviewRoute::AskQuestion);
    }

    #[test]
    fn test_counts_only_messages_with_matching_name() {
        let messages = vec![
            InterviewMessage::human("Opening"),
            InterviewMessage::ai("q"),
            InterviewMessage::ai("unnamed answer"),
        ];
        assert_eq!(
            route_messages(&messages, 1, EXPERT_NAME),
            InterviewRoute::AskQuestion
        );
        assert_eq!(route_messages(&messages, 1, "other"), InterviewRoute::AskQuestion);
    }
}
