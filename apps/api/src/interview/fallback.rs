//! Static question bank used whenever the generative backend is unavailable or
//! its output is rejected. Every entry is a complete question ending in `?`.

use std::sync::{Mutex, MutexGuard};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::models::interview::ProficiencyLevel;

fn curated(technology: &str, proficiency: ProficiencyLevel) -> Option<&'static [&'static str]> {
    use ProficiencyLevel::*;

    let questions: &'static [&'static str] = match (technology, proficiency) {
        ("Python", Beginner) => &[
            "What are the main data types in Python and when do you use each one?",
            "What is the difference between lists and tuples in Python, and when would you choose each?",
            "How do you handle user input and basic error checking in Python?",
        ],
        ("Python", Intermediate) => &[
            "How do you handle exceptions in Python? Can you give an example?",
            "How does Python manage memory, and how does its garbage collector work?",
            "What are Python decorators and how would you create one?",
            "How do you work with files in Python, and can you give an example?",
            "What's the difference between shallow and deep copy in Python?",
        ],
        ("Python", Advanced) => &[
            "How would you optimize a slow Python application?",
            "What is Python's Global Interpreter Lock (GIL) and what are its implications?",
            "How would you implement a metaclass in Python?",
            "How does Python's import system work?",
            "How do you implement proper logging in a Python application?",
        ],
        ("JavaScript", Beginner) => &[
            "What's the difference between var, let, and const?",
            "How does JavaScript handle data types?",
            "What is the DOM and how do you manipulate it?",
        ],
        ("JavaScript", Intermediate) => &[
            "How do you handle asynchronous operations in JavaScript?",
            "What are closures in JavaScript, and can you show an example?",
            "What are JavaScript promises and how do they work?",
        ],
        ("JavaScript", Advanced) => &[
            "How would you implement a custom state management system?",
            "What is event delegation and when would you use it?",
            "How would you optimize JavaScript performance in a large application?",
        ],
        _ => return None,
    };
    Some(questions)
}

fn generic(technology: &str) -> Vec<String> {
    vec![
        format!("What was a challenging {technology} project you worked on, and how did you solve its technical problems?"),
        format!("What are the best practices you follow when working with {technology}?"),
        format!("How do you debug and troubleshoot issues in {technology}?"),
    ]
}

/// Curated questions with a seedable random picker.
pub struct StaticBank {
    rng: Mutex<StdRng>,
}

impl StaticBank {
    /// `seed = None` draws from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// All fallback candidates for a technology at a level.
    pub fn candidates(&self, technology: &str, proficiency: ProficiencyLevel) -> Vec<String> {
        match curated(technology, proficiency) {
            Some(questions) => questions.iter().map(|q| q.to_string()).collect(),
            None => generic(technology),
        }
    }

    /// Picks uniformly among candidates not yet asked; if every candidate has
    /// been asked, picks among all of them.
    pub fn question<F>(&self, technology: &str, proficiency: ProficiencyLevel, already_asked: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        let candidates = self.candidates(technology, proficiency);
        let fresh: Vec<&String> = candidates.iter().filter(|q| !already_asked(q)).collect();
        let pool: Vec<&String> = if fresh.is_empty() {
            candidates.iter().collect()
        } else {
            fresh
        };

        let mut rng = self.rng();
        match pool.choose(&mut *rng) {
            Some(question) => (*question).clone(),
            None => format!("What are the best practices you follow when working with {technology}?"),
        }
    }

    /// Keyword-driven follow-up to the candidate's previous answer.
    pub fn follow_up(&self, technology: &str, answer: &str) -> String {
        let answer_lower = answer.to_lowercase();

        if answer_lower.contains("project") {
            format!("What was the biggest technical challenge in that {technology} project and how did you overcome it?")
        } else if answer_lower.contains("error") || answer_lower.contains("bug") {
            format!("How do you typically debug {technology} applications when you encounter issues?")
        } else if answer_lower.contains("performance") {
            format!("What specific techniques do you use to improve {technology} performance?")
        } else if answer_lower.contains("code") || answer_lower.contains("implementation") {
            "Can you walk me through the code structure and explain your design decisions?".to_string()
        } else {
            format!("Can you give a specific example of how you used {technology} to solve a complex problem?")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVELS: [ProficiencyLevel; 3] = [
        ProficiencyLevel::Beginner,
        ProficiencyLevel::Intermediate,
        ProficiencyLevel::Advanced,
    ];

    #[test]
    fn test_every_bank_question_is_well_formed() {
        let bank = StaticBank::new(Some(1));
        for tech in ["Python", "JavaScript", "Rust", "C"] {
            for level in LEVELS {
                for q in bank.candidates(tech, level) {
                    assert!(q.ends_with('?'), "{q}");
                    assert!(q.chars().count() > 20, "{q}");
                }
            }
        }
    }

    #[test]
    fn test_curated_lookup_is_exact_match() {
        let bank = StaticBank::new(Some(1));
        let curated = bank.candidates("Python", ProficiencyLevel::Advanced);
        assert!(curated.iter().any(|q| q.contains("Global Interpreter Lock")));

        let generic = bank.candidates("python", ProficiencyLevel::Advanced);
        assert!(generic.iter().all(|q| q.contains("python")));
    }

    #[test]
    fn test_unknown_technology_uses_templates() {
        let bank = StaticBank::new(Some(7));
        let q = bank.question("Elixir", ProficiencyLevel::Intermediate, |_| false);
        assert!(q.contains("Elixir"), "{q}");
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = StaticBank::new(Some(42));
        let b = StaticBank::new(Some(42));
        for _ in 0..10 {
            assert_eq!(
                a.question("Python", ProficiencyLevel::Intermediate, |_| false),
                b.question("Python", ProficiencyLevel::Intermediate, |_| false)
            );
        }
    }

    #[test]
    fn test_skips_already_asked_while_fresh_remain() {
        let bank = StaticBank::new(Some(3));
        let all = bank.candidates("JavaScript", ProficiencyLevel::Beginner);
        let only_fresh = all[2].clone();
        for _ in 0..10 {
            let q = bank.question("JavaScript", ProficiencyLevel::Beginner, |q| q != only_fresh);
            assert_eq!(q, only_fresh);
        }
    }

    #[test]
    fn test_all_asked_still_returns_a_question() {
        let bank = StaticBank::new(Some(3));
        let all = bank.candidates("JavaScript", ProficiencyLevel::Advanced);
        let q = bank.question("JavaScript", ProficiencyLevel::Advanced, |_| true);
        assert!(all.contains(&q));
    }

    #[test]
    fn test_follow_up_keyword_routing() {
        let bank = StaticBank::new(Some(1));
        assert!(bank
            .follow_up("Go", "In one PROJECT we rewrote the scheduler")
            .contains("biggest technical challenge in that Go project"));
        assert!(bank
            .follow_up("Go", "I chased a nasty bug")
            .contains("debug Go applications"));
        assert!(bank
            .follow_up("Go", "we cared about performance")
            .contains("improve Go performance"));
        assert!(bank
            .follow_up("Go", "the implementation was simple")
            .starts_with("Can you walk me through the code structure"));
        assert!(bank
            .follow_up("Go", "I like it")
            .contains("specific example of how you used Go"));
    }

    #[test]
    fn test_follow_up_project_wins_over_error() {
        let bank = StaticBank::new(Some(1));
        let q = bank.follow_up("Rust", "the project had an error in the parser");
        assert!(q.contains("Rust project"), "{q}");
    }
}
