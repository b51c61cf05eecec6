// src/outline/templates.rs
//! Deterministic outline generator: static per-category skeletons stretched or
//! trimmed to the requested course length. Pure; same inputs → same outline.

use crate::classify::Category;
use crate::model::{CourseOutline, Difficulty, SubtopicSpec};

pub const MIN_SUBTOPICS: usize = 6;
pub const MAX_SUBTOPICS: usize = 10;

/// One planned unit; `{topic}` is substituted at render time.
#[derive(Debug, Clone, Copy)]
pub struct Skeleton {
    pub title: &'static str,
    pub description: &'static str,
    pub key_points: [&'static str; 3],
}

const fn sk(title: &'static str, description: &'static str, key_points: [&'static str; 3]) -> Skeleton {
    Skeleton {
        title,
        description,
        key_points,
    }
}

const PROGRAMMING: &[Skeleton] = &[
    sk("Getting Started with {topic}", "Install the toolchain, write a first program and learn how {topic} code is built and run.", ["Toolchain setup", "Hello world", "Build and run cycle"]),
    sk("{topic} Syntax and Core Types", "Variables, primitive types and expressions that every {topic} program relies on.", ["Variables and mutability", "Primitive types", "Expressions and statements"]),
    sk("Control Flow in {topic}", "Branching and looping constructs, and how to choose between them.", ["Conditionals", "Loops", "Pattern matching and early exits"]),
    sk("Functions and Modules", "Splitting {topic} programs into reusable functions and modules.", ["Function signatures", "Scope and visibility", "Organizing modules"]),
    sk("Data Structures in {topic}", "Collections and user-defined types for modelling real problems.", ["Arrays and lists", "Maps and sets", "Custom types"]),
    sk("Error Handling", "Detecting, reporting and recovering from failures in {topic}.", ["Error values vs exceptions", "Propagating errors", "Writing robust code"]),
    sk("Testing {topic} Code", "Unit and integration tests that keep a {topic} codebase healthy.", ["Unit tests", "Test organization", "Debugging failing tests"]),
    sk("Working with Libraries", "Finding, adding and using third-party packages in {topic}.", ["Package managers", "Reading documentation", "Dependency hygiene"]),
    sk("Concurrency and Performance", "Running work in parallel and measuring what matters.", ["Threads and tasks", "Shared state", "Profiling basics"]),
    sk("Building a {topic} Project", "Combine everything into a small end-to-end project.", ["Project structure", "Incremental delivery", "Next steps"]),
];

const WEB: &[Skeleton] = &[
    sk("Introduction to {topic}", "What {topic} is, where it fits in the web stack and how to set up a project.", ["What problem it solves", "Project setup", "Developer tooling"]),
    sk("{topic} Fundamentals", "Core building blocks and the mental model behind {topic}.", ["Core concepts", "Rendering model", "Project anatomy"]),
    sk("Components and Structure", "Structuring interfaces into reusable, composable pieces.", ["Component design", "Props and composition", "File organization"]),
    sk("State and Data Flow", "Keeping UI and data in sync as the application grows.", ["Local state", "Shared state", "Unidirectional data flow"]),
    sk("Styling and Layout", "Making {topic} applications look good on every screen size.", ["CSS strategies", "Responsive layout", "Design systems"]),
    sk("Working with APIs", "Fetching, caching and displaying remote data.", ["HTTP requests", "Loading and error states", "Caching responses"]),
    sk("Routing and Navigation", "Multi-page experiences and URL-driven state.", ["Client-side routing", "Route parameters", "Navigation guards"]),
    sk("Forms and User Input", "Collecting and validating user input reliably.", ["Controlled inputs", "Validation", "Accessibility"]),
    sk("Testing and Debugging {topic} Apps", "Tools and habits for shipping working web applications.", ["Unit and component tests", "Browser devtools", "End-to-end tests"]),
    sk("Deploying {topic} Applications", "Building for production and shipping to users.", ["Production builds", "Hosting options", "Performance checks"]),
];

const DATA_SCIENCE: &[Skeleton] = &[
    sk("Introduction to {topic}", "The data science workflow and where {topic} fits into it.", ["The data workflow", "Tooling setup", "Asking good questions"]),
    sk("Working with Data", "Loading, inspecting and cleaning real-world datasets.", ["Loading data", "Missing values", "Data types"]),
    sk("Exploratory Data Analysis", "Summaries and visualisations that reveal structure in data.", ["Descriptive statistics", "Distributions", "Correlation"]),
    sk("Data Visualization", "Communicating findings with clear charts.", ["Choosing a chart", "Plotting libraries", "Storytelling with data"]),
    sk("Statistics for {topic}", "Probability and inference needed to reason about results.", ["Probability basics", "Hypothesis testing", "Confidence intervals"]),
    sk("Feature Engineering", "Turning raw columns into informative model inputs.", ["Encoding categories", "Scaling", "Feature selection"]),
    sk("Building Models", "Training baseline models and understanding what they learn.", ["Train/test split", "Regression and classification", "Baselines"]),
    sk("Evaluating Models", "Measuring model quality honestly.", ["Metrics", "Cross-validation", "Overfitting"]),
    sk("Improving Models", "Tuning and iterating toward better performance.", ["Hyperparameter tuning", "Ensembles", "Error analysis"]),
    sk("{topic} in Practice", "Putting a complete analysis or model into production.", ["Reproducibility", "Deployment options", "Monitoring"]),
];

const DESIGN: &[Skeleton] = &[
    sk("Introduction to {topic}", "Principles of {topic} and how designers approach a problem.", ["Design thinking", "Role of the designer", "Tool setup"]),
    sk("Visual Design Principles", "Hierarchy, balance and contrast as the grammar of design.", ["Visual hierarchy", "Balance and alignment", "Contrast"]),
    sk("Color and Typography", "Choosing colors and type that communicate clearly.", ["Color theory", "Type pairing", "Readability"]),
    sk("Layout and Grids", "Structuring content with grids and whitespace.", ["Grid systems", "Whitespace", "Responsive layouts"]),
    sk("User Research", "Understanding users before designing for them.", ["Interviews", "Personas", "Journey maps"]),
    sk("Wireframing and Prototyping", "Exploring ideas quickly at low and high fidelity.", ["Low-fidelity sketches", "Interactive prototypes", "Iteration"]),
    sk("Design Systems", "Reusable components and tokens for consistent products.", ["Components", "Design tokens", "Documentation"]),
    sk("Usability Testing", "Validating designs with real users.", ["Test planning", "Running sessions", "Synthesizing findings"]),
    sk("Accessibility in {topic}", "Designing for everyone.", ["Contrast and legibility", "Assistive technology", "Inclusive patterns"]),
    sk("Building a {topic} Portfolio", "Presenting work and process convincingly.", ["Case studies", "Presenting process", "Feedback"]),
];

const BUSINESS: &[Skeleton] = &[
    sk("Introduction to {topic}", "Key ideas and vocabulary of {topic}.", ["Core vocabulary", "Why it matters", "Common misconceptions"]),
    sk("Understanding the Market", "Customers, competitors and the forces shaping a market.", ["Market sizing", "Competitive analysis", "Customer segments"]),
    sk("Strategy Fundamentals", "Setting direction and making trade-offs.", ["Value proposition", "Competitive advantage", "Strategic choices"]),
    sk("Finance Essentials", "Reading the numbers behind decisions.", ["Revenue and costs", "Cash flow", "Unit economics"]),
    sk("Marketing and Growth", "Reaching customers and growing demand.", ["Positioning", "Channels", "Measuring growth"]),
    sk("Sales and Customer Relationships", "Turning interest into long-term customers.", ["Sales process", "Negotiation", "Retention"]),
    sk("Operations and Processes", "Delivering reliably as the organisation scales.", ["Process design", "Quality", "Tooling"]),
    sk("Leadership and Teams", "Building and leading effective teams.", ["Hiring", "Motivation", "Communication"]),
    sk("Measuring Performance", "KPIs and feedback loops that keep {topic} on track.", ["Choosing KPIs", "Dashboards", "Reviews"]),
    sk("Putting {topic} into Practice", "A capstone plan that applies the course end to end.", ["Action plan", "Risks", "Next steps"]),
];

/// Generic skeleton stamped once per phase for unrecognized topics.
const GENERIC: Skeleton = sk(
    "{phase}: {topic}",
    "This part covers {phase_lower} for {topic}.",
    ["Key ideas of {phase_lower}", "Worked examples", "Common pitfalls"],
);

const GENERIC_PHASES: &[&str] = &[
    "Introduction",
    "Core Concepts",
    "Essential Techniques",
    "Tools and Resources",
    "Practical Applications",
    "Common Challenges",
    "Intermediate Topics",
    "Advanced Topics",
    "Real-World Projects",
    "Review and Next Steps",
];

/// Exhaustive per-category lookup; `None` means "use the generic skeleton".
pub fn skeletons_for(category: Category) -> Option<&'static [Skeleton]> {
    match category {
        Category::Programming => Some(PROGRAMMING),
        Category::Web => Some(WEB),
        Category::DataScience => Some(DATA_SCIENCE),
        Category::Design => Some(DESIGN),
        Category::Business => Some(BUSINESS),
        Category::Default => None,
    }
}

/// round(hours * 1.5) clamped to 6..=10.
pub fn subtopic_count_for(target_duration_hours: f32) -> usize {
    let raw = (target_duration_hours.max(0.0) * 1.5).round() as usize;
    raw.clamp(MIN_SUBTOPICS, MAX_SUBTOPICS)
}

fn render(s: &str, topic: &str) -> String {
    s.replace("{topic}", topic)
}

fn render_generic(s: &str, topic: &str, phase: &str) -> String {
    s.replace("{phase_lower}", &phase.to_lowercase())
        .replace("{phase}", phase)
        .replace("{topic}", topic)
}

fn prerequisites_for(difficulty: Difficulty, topic: &str) -> Vec<String> {
    match difficulty {
        Difficulty::Beginner => vec!["No prior experience required".to_string()],
        Difficulty::Intermediate => vec![format!("Basic familiarity with {topic}")],
        Difficulty::Advanced => vec![
            format!("Solid working knowledge of {topic}"),
            "Experience building small projects independently".to_string(),
        ],
    }
}

/// Build the fallback outline for `topic`.
pub fn deterministic_outline(
    topic: &str,
    category: Category,
    difficulty: Difficulty,
    target_duration_hours: f32,
) -> CourseOutline {
    let count = subtopic_count_for(target_duration_hours);
    let total_minutes = (target_duration_hours.max(0.0) * 60.0).round() as u32;
    let per_subtopic = (total_minutes / count as u32).max(1);

    let subtopics: Vec<SubtopicSpec> = match skeletons_for(category) {
        Some(list) => list
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, s)| SubtopicSpec {
                order: i as u32 + 1,
                title: render(s.title, topic),
                description: render(s.description, topic),
                key_points: s.key_points.iter().map(|k| render(k, topic)).collect(),
                estimated_duration_minutes: per_subtopic,
            })
            .collect(),
        None => GENERIC_PHASES
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, phase)| SubtopicSpec {
                order: i as u32 + 1,
                title: render_generic(GENERIC.title, topic, phase),
                description: render_generic(GENERIC.description, topic, phase),
                key_points: GENERIC
                    .key_points
                    .iter()
                    .map(|k| render_generic(k, topic, phase))
                    .collect(),
                estimated_duration_minutes: per_subtopic,
            })
            .collect(),
    };

    let learning_objectives = subtopics
        .iter()
        .take(4)
        .map(|s| format!("Understand {}", s.title.to_lowercase()))
        .collect();

    CourseOutline {
        title: format!("{topic}: {} Course", difficulty.label()),
        description: format!(
            "A {} course on {topic} in {} lessons, moving from fundamentals to practical application.",
            difficulty.label().to_lowercase(),
            subtopics.len()
        ),
        total_duration_minutes: subtopics.iter().map(|s| s.estimated_duration_minutes).sum(),
        subtopics,
        prerequisites: prerequisites_for(difficulty, topic),
        learning_objectives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_a_template_long_enough() {
        for c in Category::ALL {
            match skeletons_for(c) {
                Some(list) => assert!(list.len() >= MAX_SUBTOPICS, "{c}"),
                None => assert!(GENERIC_PHASES.len() >= MAX_SUBTOPICS),
            }
        }
    }

    #[test]
    fn count_is_clamped() {
        assert_eq!(subtopic_count_for(0.5), 6);
        assert_eq!(subtopic_count_for(5.0), 8);
        assert_eq!(subtopic_count_for(40.0), 10);
        assert_eq!(subtopic_count_for(f32::NAN.max(0.0)), 6);
    }

    #[test]
    fn generic_outline_substitutes_phase() {
        let o = deterministic_outline("Pottery", Category::Default, Difficulty::Beginner, 4.0);
        assert_eq!(o.subtopics.len(), 6);
        assert_eq!(o.subtopics[0].title, "Introduction: Pottery");
        assert!(o.subtopics[1].description.contains("core concepts"));
        assert!(!o.subtopics[0].title.contains('{'));
    }

    #[test]
    fn durations_split_evenly() {
        let o = deterministic_outline("React", Category::Web, Difficulty::Advanced, 6.0);
        assert_eq!(o.subtopics.len(), 9);
        assert!(o.subtopics.iter().all(|s| s.estimated_duration_minutes == 40));
        assert_eq!(o.total_duration_minutes, 360);
        assert_eq!(o.prerequisites.len(), 2);
    }
}
