//! Canned assistant text: the greeting, the fallback apology, the rotating
//! suggestion pool, and the short-circuit replies for website questions.

/// First message every conversation opens with.
pub const GREETING: &str = "Namaste! 🌸 Welcome to the ADTU Smart Campus Assistant. I can help you with admissions, courses, fees, campus facilities, placements, and more. How may I assist you today?";

/// Shown in place of an answer when the backend request fails.
pub const APOLOGY: &str = "I apologize, but I encountered an error. Please try again or visit www.adtu.in for detailed information.";

/// One of these is picked at random while a reply is pending.
pub const LOADING_PHRASES: [&str; 8] = [
    "Analyzing your question with ADTU AI...",
    "Searching through university database...",
    "Processing your request intelligently...",
    "Consulting ADTU knowledge base...",
    "Generating personalized response...",
    "Accessing campus information...",
    "Checking latest admission updates...",
    "Verifying course details...",
];

/// Prompt ideas, shown one at a time as the input placeholder and all at
/// once in the quick-question picker.
pub const SUGGESTED_QUESTIONS: [&str; 8] = [
    "Ask about B.Tech admissions 2024...",
    "What are the computer science eligibility criteria?",
    "Tell me about hostel facilities and fees...",
    "How to apply for scholarships?",
    "What companies visit for placements?",
    "Where are the exam halls located?",
    "What courses do you offer in Engineering?",
    "Contact number and campus address...",
];

/// Keyword-triggered replies answered locally without asking the backend.
/// Order matters: the first key contained in the question wins.
const SPECIAL_RESPONSES: [(&str, &str); 4] = [
    (
        "website",
        "🌐 Visit our official website: **www.adtu.in** for detailed information about admissions, courses, faculty, campus life, and more!",
    ),
    (
        "adtu.in",
        "🔗 Our website **www.adtu.in** has all the information you need - admission forms, fee structure, academic calendar, and contact details!",
    ),
    (
        "online",
        "💻 For online applications and detailed information, visit **www.adtu.in**. You can apply online, check status, and download brochures!",
    ),
    (
        "internet",
        "📱 All information is available online at **www.adtu.in**. You can also follow us on social media for updates!",
    ),
];

/// Looks up a canned reply for questions about the website. Matching is
/// case-insensitive and fires on substrings anywhere in the question.
pub fn special_reply(question: &str) -> Option<&'static str> {
    let needle = question.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    SPECIAL_RESPONSES
        .iter()
        .find(|(key, _)| needle.contains(key))
        .map(|(_, reply)| *reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_reply_matches_each_keyword() {
        for (key, reply) in SPECIAL_RESPONSES {
            assert_eq!(special_reply(key), Some(reply));
        }
    }

    #[test]
    fn test_special_reply_is_case_insensitive() {
        assert!(special_reply("Is the WEBSITE down?").is_some());
        assert!(special_reply("ONLINE application").is_some());
    }

    #[test]
    fn test_special_reply_matches_substring() {
        let reply = special_reply("how do I reach www.adtu.in from my phone");
        assert_eq!(reply, Some(SPECIAL_RESPONSES[1].1));
    }

    #[test]
    fn test_first_listed_keyword_wins() {
        // Contains both "website" and "online"; table order decides.
        let reply = special_reply("is the website online");
        assert_eq!(reply, Some(SPECIAL_RESPONSES[0].1));
    }

    #[test]
    fn test_ordinary_questions_pass_through() {
        assert_eq!(special_reply("hostel fees for 2024"), None);
        assert_eq!(special_reply(""), None);
        assert_eq!(special_reply("   "), None);
    }
}
