//! Rule-based support assistant.
//!
//! Replies come from a fixed, ordered table: the first rule with any keyword
//! contained in the input (case-insensitive) answers. Keywords of up to three
//! letters must appear as a whole word. No state is kept between turns.

pub struct Rule {
    pub keywords: &'static [&'static str],
    pub response: &'static str,
}

pub const FALLBACK_RESPONSE: &str = "I'm not sure I understood that. You can ask me about \
finding jobs, applying, posting a job, payments, your profile or messages. For anything else, \
reach our support team at support@jobsoko.co.ke.";

pub const RULES: &[Rule] = &[
    Rule {
        keywords: &["hello", "hi", "hey", "habari", "jambo", "mambo"],
        response: "Habari! I'm the JobSoko assistant. How can I help you today?",
    },
    Rule {
        keywords: &["post a job", "post job", "hire", "hiring", "vacancy"],
        response: "To post a job, open your employer dashboard and choose \"Post Job\". Add the \
title, location, salary range and required skills, then publish. Urgent listings are \
highlighted to job seekers.",
    },
    Rule {
        keywords: &["apply", "application"],
        response: "Open any job listing and tap \"Apply Now\". You can attach your resume and a \
short cover letter. Track progress under \"My Applications\".",
    },
    Rule {
        keywords: &["find job", "search", "looking for work", "jobs near"],
        response: "Use the search bar on the jobs page to filter by title, company, location or \
skill. The map view shows openings near you.",
    },
    Rule {
        keywords: &["mpesa", "m-pesa", "payment", "pay", "subscription", "plan"],
        response: "We accept M-Pesa. Pick a plan on the Payments page, enter your Safaricom \
number and confirm the prompt on your phone. Your receipt appears in payment history.",
    },
    Rule {
        keywords: &["resume", "cv", "profile", "photo"],
        response: "Keep your profile complete: add your skills, location and a PDF resume from \
the Profile page. Complete profiles get more employer views.",
    },
    Rule {
        keywords: &["message", "chat", "contact employer"],
        response: "Open Messages from the sidebar to chat with employers or applicants. New \
messages show up instantly.",
    },
    Rule {
        keywords: &["interview", "calendar", "schedule"],
        response: "Interviews scheduled by employers appear in your Calendar along with any \
reminders you add.",
    },
    Rule {
        keywords: &["saved", "bookmark"],
        response: "Tap the bookmark icon on a listing to save it. Saved jobs live under \"Saved \
Jobs\".",
    },
    Rule {
        keywords: &["password", "login", "log in", "sign in", "account"],
        response: "For sign-in problems, use \"Forgot password\" on the login page. If that fails, \
email support@jobsoko.co.ke from your registered address.",
    },
    Rule {
        keywords: &["thank", "asante"],
        response: "Karibu! Anything else I can help with?",
    },
];

const WHOLE_WORD_MAX: usize = 3;

fn keyword_hit(haystack: &str, words: &[&str], keyword: &str) -> bool {
    let keyword = keyword.to_lowercase();
    if keyword.chars().count() <= WHOLE_WORD_MAX && !keyword.contains(' ') {
        words.iter().any(|w| *w == keyword)
    } else {
        haystack.contains(&keyword)
    }
}

/// Index of the first rule matching `input`, if any.
pub fn match_rule(input: &str) -> Option<usize> {
    let haystack = input.to_lowercase();
    let words: Vec<&str> = haystack
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    RULES.iter().position(|rule| {
        rule.keywords
            .iter()
            .any(|keyword| keyword_hit(&haystack, &words, keyword))
    })
}

pub fn respond(input: &str) -> &'static str {
    match_rule(input)
        .map(|idx| RULES[idx].response)
        .unwrap_or(FALLBACK_RESPONSE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_keyword_selects_its_rule_or_an_earlier_one() {
        for (idx, rule) in RULES.iter().enumerate() {
            for keyword in rule.keywords {
                let input = format!("please {} now", keyword.to_uppercase());
                let matched = match_rule(&input).expect("keyword should match");
                assert!(matched <= idx, "{} matched rule {}", keyword, matched);
                if matched == idx {
                    assert_eq!(respond(&input), rule.response);
                }
            }
        }
    }

    #[test]
    fn first_rule_wins_when_several_match() {
        // "apply" and "payment" both appear; the application rule comes first.
        assert_eq!(respond("How do I apply after payment?"), RULES[2].response);
    }

    #[test]
    fn unmatched_input_gets_fallback() {
        assert_eq!(respond("what's the weather in Kisumu"), FALLBACK_RESPONSE);
        assert_eq!(respond(""), FALLBACK_RESPONSE);
    }

    #[test]
    fn short_greetings_match_as_whole_words() {
        let greeting = RULES[0].response;
        assert_eq!(respond("hi"), greeting);
        assert_eq!(respond("Hi!"), greeting);
        assert_eq!(respond("hi, is anyone there?"), greeting);
        assert_ne!(respond("this salary"), greeting);
        assert_ne!(respond("which chips"), greeting);
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(respond("M-PESA not working"), RULES[4].response);
    }
}
