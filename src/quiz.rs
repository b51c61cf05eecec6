// src/quiz.rs
//! Quiz synthesizer: deterministic multiple-choice questions per subtopic.
//!
//! Known categories draw three questions from their bank (rotating by subtopic
//! order) plus one key-point question; unknown topics get the generic
//! two-question template. Output is always 1..=4 well-formed questions.

use crate::classify::Category;
use crate::model::{QuizQuestion, SubtopicSpec};

pub const MAX_QUESTIONS: usize = 4;
const BANK_PICKS: usize = 3;

struct BankEntry {
    question: &'static str,
    correct: &'static str,
    distractors: [&'static str; 3],
    explanation: &'static str,
}

const fn q(
    question: &'static str,
    correct: &'static str,
    distractors: [&'static str; 3],
    explanation: &'static str,
) -> BankEntry {
    BankEntry {
        question,
        correct,
        distractors,
        explanation,
    }
}

const PROGRAMMING_BANK: &[BankEntry] = &[
    q("When learning {subtopic} in {topic}, what is the most reliable way to confirm your understanding?",
      "Write and run small programs that exercise the concept",
      ["Read the chapter twice", "Memorize the keywords", "Skip to the next lesson"],
      "Running code gives immediate feedback and exposes misconceptions."),
    q("What should you do first when a {topic} program fails with an error?",
      "Read the error message and locate the line it points to",
      ["Rewrite the program from scratch", "Ignore it and add more code", "Reinstall the compiler"],
      "Error messages usually name the problem and where it happened."),
    q("Why are automated tests valuable when working on {subtopic}?",
      "They catch regressions when code changes",
      ["They make programs run faster", "They replace documentation entirely", "They are required by every compiler"],
      "Tests document expected behaviour and fail loudly when it breaks."),
    q("Which habit best keeps {topic} code maintainable?",
      "Small, well-named functions with a single responsibility",
      ["One large function for the whole program", "Global variables for all state", "Avoiding comments and names entirely"],
      "Small focused units are easier to read, test and change."),
];

const WEB_BANK: &[BankEntry] = &[
    q("In {topic}, what is the main benefit of splitting an interface into components while learning {subtopic}?",
      "Reusable, independently testable pieces of UI",
      ["Fewer HTTP requests by default", "Automatic search engine ranking", "No need for CSS"],
      "Components isolate structure and behaviour so they can be reused and tested."),
    q("Which tool is most useful for inspecting layout and network issues in a {topic} app?",
      "The browser developer tools",
      ["The operating system task manager", "A spreadsheet", "The package lock file"],
      "Devtools expose the DOM, styles, console and network activity."),
    q("What does responsive design ensure for a {topic} application?",
      "The layout adapts to different screen sizes",
      ["The server responds faster", "JavaScript is never needed", "Images are always cached"],
      "Responsive layouts use fluid grids and media queries to fit any viewport."),
    q("Why should a {topic} app handle loading and error states when fetching data?",
      "Users get feedback instead of a blank or broken page",
      ["It makes requests return sooner", "Browsers require it to render HTML", "It removes the need for an API"],
      "Explicit states keep the UI predictable while data is in flight or failing."),
];

const DATA_SCIENCE_BANK: &[BankEntry] = &[
    q("Why is a held-out test set important when applying {subtopic}?",
      "It estimates how the model performs on unseen data",
      ["It makes training faster", "It increases the dataset size", "It removes the need for features"],
      "Evaluating on data the model never saw exposes overfitting."),
    q("What is usually the first step when starting a {topic} project?",
      "Explore and clean the data",
      ["Tune hyperparameters", "Deploy the model", "Choose the most complex algorithm"],
      "Data quality issues dominate results, so understand the data first."),
    q("Which practice helps make a {topic} analysis reproducible?",
      "Versioning code and fixing random seeds",
      ["Editing data by hand in place", "Running cells out of order", "Keeping results only in memory"],
      "Versioned code and fixed seeds let others regenerate the same results."),
    q("What does overfitting mean in the context of {subtopic}?",
      "The model memorizes training data and generalizes poorly",
      ["The model is too simple to learn anything", "The dataset has too many rows", "The model trains too quickly"],
      "An overfit model scores well on training data but badly on new data."),
];

const DESIGN_BANK: &[BankEntry] = &[
    q("What is the purpose of visual hierarchy when working on {subtopic}?",
      "To guide attention to the most important elements first",
      ["To use as many colors as possible", "To fill every empty space", "To make all text the same size"],
      "Size, contrast and placement tell users where to look first."),
    q("Why test a {topic} design with real users?",
      "To uncover usability problems the team cannot see",
      ["To finish the project faster", "To avoid writing documentation", "To choose a brand color"],
      "Users reveal confusion and friction that designers are too close to notice."),
    q("What makes a design accessible?",
      "It can be used by people with a wide range of abilities",
      ["It uses the latest design trends", "It only works on large screens", "It relies on color alone to convey meaning"],
      "Accessible design considers contrast, assistive technology and input methods."),
    q("Why prototype before building a final {topic} design?",
      "To test ideas cheaply and iterate quickly",
      ["Prototypes replace the final product", "It guarantees no further changes", "Stakeholders never need to review it"],
      "Prototypes let you learn from feedback before investing in production work."),
];

const BUSINESS_BANK: &[BankEntry] = &[
    q("What is a value proposition in the context of {subtopic}?",
      "A clear statement of the benefit a customer receives",
      ["The company's legal structure", "A list of internal processes", "The annual budget"],
      "The value proposition explains why a customer should choose you."),
    q("Why track key performance indicators in {topic}?",
      "To measure progress against goals and adjust decisions",
      ["To replace strategy", "To satisfy tax rules", "To avoid talking to customers"],
      "KPIs turn goals into measurable signals for decision making."),
    q("What is the main purpose of competitive analysis?",
      "Understanding alternatives customers can choose instead",
      ["Copying every competitor feature", "Setting employee salaries", "Choosing office locations"],
      "Knowing the alternatives clarifies positioning and differentiation."),
    q("Which statement best describes cash flow?",
      "The movement of money into and out of a business over time",
      ["Total profit since founding", "The value of company stock", "The number of customers"],
      "A profitable business can still fail if it runs out of cash."),
];

/// Exhaustive bank lookup; `None` routes to the generic template.
fn bank_for(category: Category) -> Option<&'static [BankEntry]> {
    match category {
        Category::Programming => Some(PROGRAMMING_BANK),
        Category::Web => Some(WEB_BANK),
        Category::DataScience => Some(DATA_SCIENCE_BANK),
        Category::Design => Some(DESIGN_BANK),
        Category::Business => Some(BUSINESS_BANK),
        Category::Default => None,
    }
}

fn fill(s: &str, topic: &str, subtopic: &str) -> String {
    s.replace("{topic}", topic).replace("{subtopic}", subtopic)
}

/// Build a question with the correct option moved to `position % len`.
/// Duplicate options are dropped; `None` if fewer than two remain.
fn build_question(
    question: String,
    correct: String,
    distractors: impl IntoIterator<Item = String>,
    explanation: String,
    position: usize,
) -> Option<QuizQuestion> {
    let mut options = vec![correct];
    for d in distractors {
        if !options.iter().any(|o| o.eq_ignore_ascii_case(&d)) {
            options.push(d);
        }
    }
    if options.len() < 2 {
        return None;
    }
    let shift = position % options.len();
    options.rotate_right(shift);
    Some(QuizQuestion {
        question,
        options,
        correct_option_index: shift,
        explanation,
    })
}

fn key_point_question(topic: &str, subtopic: &SubtopicSpec, position: usize) -> Option<QuizQuestion> {
    let kp = subtopic.key_points.first()?;
    build_question(
        format!("Which of the following is a key point of \"{}\"?", subtopic.title),
        kp.clone(),
        [
            "Memorizing definitions without practice".to_string(),
            format!("Avoiding {topic} documentation"),
            "Skipping the fundamentals entirely".to_string(),
        ],
        format!("\"{kp}\" is one of the key points covered in {}.", subtopic.title),
        position,
    )
}

fn generic_questions(topic: &str, subtopic: &SubtopicSpec) -> Vec<QuizQuestion> {
    let base = subtopic.order as usize;
    let focus = subtopic
        .key_points
        .first()
        .cloned()
        .unwrap_or_else(|| format!("Understanding {}", subtopic.title));
    let second = subtopic
        .key_points
        .get(1)
        .cloned()
        .unwrap_or_else(|| format!("the core ideas of {}", subtopic.title));

    [
        build_question(
            format!("What is the main focus of \"{}\"?", subtopic.title),
            focus,
            [
                "Unrelated historical trivia".to_string(),
                "Memorizing facts without context".to_string(),
                "Skipping practice entirely".to_string(),
            ],
            format!("{} centres on its key ideas and how to apply them.", subtopic.title),
            base,
        ),
        build_question(
            format!("Why is \"{second}\" important when studying {topic}?"),
            format!("It builds a foundation for applying {topic} in practice"),
            [
                "It is only relevant for exams".to_string(),
                "It has no practical use".to_string(),
                "It replaces the need for practice".to_string(),
            ],
            format!("Understanding {second} makes later lessons on {topic} easier to apply."),
            base + 1,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Deterministic quiz for one subtopic; 1..=4 questions.
pub fn synthesize_quiz(topic: &str, subtopic: &SubtopicSpec, category: Category) -> Vec<QuizQuestion> {
    let mut out: Vec<QuizQuestion> = match bank_for(category) {
        Some(bank) => {
            let start = (subtopic.order as usize).saturating_sub(1);
            let mut qs: Vec<QuizQuestion> = (0..BANK_PICKS.min(bank.len()))
                .filter_map(|j| {
                    let e = &bank[(start + j) % bank.len()];
                    build_question(
                        fill(e.question, topic, &subtopic.title),
                        fill(e.correct, topic, &subtopic.title),
                        e.distractors.iter().map(|d| fill(d, topic, &subtopic.title)),
                        fill(e.explanation, topic, &subtopic.title),
                        start + j,
                    )
                })
                .collect();
            qs.extend(key_point_question(topic, subtopic, start + BANK_PICKS));
            qs
        }
        None => generic_questions(topic, subtopic),
    };

    out.truncate(MAX_QUESTIONS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(order: u32, kps: &[&str]) -> SubtopicSpec {
        SubtopicSpec {
            order,
            title: "Hooks".into(),
            description: String::new(),
            key_points: kps.iter().map(|s| s.to_string()).collect(),
            estimated_duration_minutes: 20,
        }
    }

    #[test]
    fn every_category_yields_1_to_4_well_formed_questions() {
        for c in Category::ALL {
            for kps in [&[][..], &["useState"][..], &["a", "b", "c"][..]] {
                let qs = synthesize_quiz("React", &sub(3, kps), c);
                assert!((1..=MAX_QUESTIONS).contains(&qs.len()), "{c}: {}", qs.len());
                assert!(qs.iter().all(QuizQuestion::is_well_formed), "{c}");
            }
        }
    }

    #[test]
    fn generic_template_uses_key_points() {
        let qs = synthesize_quiz("Pottery", &sub(1, &["Clay prep", "Wheel throwing"]), Category::Default);
        assert_eq!(qs.len(), 2);
        assert_eq!(qs[0].options[qs[0].correct_option_index], "Clay prep");
        assert!(qs[1].question.contains("Wheel throwing"));
    }

    #[test]
    fn generic_defaults_without_key_points() {
        let qs = synthesize_quiz("Pottery", &sub(1, &[]), Category::Default);
        assert_eq!(qs[0].options[qs[0].correct_option_index], "Understanding Hooks");
        assert!(qs[1].question.contains("the core ideas of Hooks"));
    }

    #[test]
    fn deterministic_and_rotating() {
        let a = synthesize_quiz("React", &sub(2, &["x"]), Category::Web);
        let b = synthesize_quiz("React", &sub(2, &["x"]), Category::Web);
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
        let positions: Vec<_> = a.iter().map(|q| q.correct_option_index).collect();
        assert_eq!(positions, vec![1, 2, 3, 0]);
    }
}
