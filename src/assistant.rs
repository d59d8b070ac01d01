//! Deterministic half of the AI-assistant contract: context snapshots,
//! prompt construction, and strict validation of the constrained grade JSON
//! the gateway returns. The generative call itself lives with the client;
//! a gateway failure is always recoverable and never touches stored data.

use serde::{Deserialize, Serialize};

use crate::models::{Course, SchoolStats, Student, Teacher};
use crate::stats;

pub const ANALYSIS_FALLBACK: &str = "An error occurred during AI analysis.";
pub const GRADING_FALLBACK: &str =
    "Unable to read the AI grading result. Please try grading again.";
pub const ASSISTANT_FALLBACK: &str =
    "Connection to AI failed. Please check your API configuration.";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayError {
    pub code: String,
    pub message: String,
    pub fallback: &'static str,
}

impl GatewayError {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            fallback: GRADING_FALLBACK,
        }
    }
}

/// Snapshot handed to the assistant with every query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSnapshot {
    pub stats: SchoolStats,
    pub top_students: Vec<Student>,
    pub at_risk_students: Vec<Student>,
    pub faculty_count: usize,
}

pub fn build_context(
    students: &[Student],
    teachers: &[Teacher],
    courses: &[Course],
) -> ContextSnapshot {
    ContextSnapshot {
        stats: stats::compute_stats(students, teachers, courses),
        top_students: stats::top_performers(students, 3),
        at_risk_students: stats::at_risk(students),
        faculty_count: teachers.len(),
    }
}

pub fn performance_prompt(student: &Student) -> String {
    format!(
        "As an educational consultant, analyze the following student data and \
         provide a brief performance summary and 3 specific recommendations for \
         improvement.\n\
         Student: {} {}\n\
         Grade: {}\n\
         Performance Score: {}/100\n\
         Attendance: {}%\n\
         Status: {}\n\n\
         Format the output in clear, professional paragraphs.",
        student.first_name,
        student.last_name,
        serde_plain(&student.grade),
        student.performance_score,
        student.attendance,
        serde_plain(&student.status),
    )
}

pub fn grading_prompt(content: &str, rubric: &str, student_name: &str) -> String {
    format!(
        "You are an expert academic grader. Evaluate the following student \
         assignment for \"{}\" based on this rubric: {}.\n\n\
         Assignment Content:\n\"\"\"\n{}\n\"\"\"\n\n\
         Provide a structured JSON response including a numeric grade (0-100), \
         a summary, a list of strengths, a list of improvements, and a letter \
         grade (A, B, C, D, or F).",
        student_name, rubric, content
    )
}

pub fn assistant_prompt(query: &str, context: &ContextSnapshot) -> String {
    let context_json =
        serde_json::to_string(context).unwrap_or_else(|_| "{}".to_string());
    format!(
        "You are EduPulse AI, an advanced school management assistant.\n\
         Current Context: {}\n\
         User Query: \"{}\"\n\n\
         Provide a helpful, concise response based on the school data provided \
         in the context. If the user asks for actions (like \"generate a \
         report\"), explain how the EduPulse interface helps them do that.",
        context_json, query
    )
}

/// Render an enum through its serde wire name ("On Leave", "10th", ...).
fn serde_plain<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    }
}

/// The constrained shape the grading call must return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeResult {
    pub score: f64,
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub letter_grade: String,
}

/// Validate a raw gateway reply into a `GradeResult`.
///
/// Models often wrap JSON answers in a Markdown code fence; that wrapper is
/// tolerated. Anything else malformed is a recoverable gateway error carrying
/// a user-facing fallback message.
pub fn parse_grade_response(raw: &str) -> Result<GradeResult, GatewayError> {
    let body = strip_code_fence(raw);
    let result: GradeResult = serde_json::from_str(body)
        .map_err(|e| GatewayError::new("gateway_error", format!("malformed grade JSON: {}", e)))?;

    if !result.score.is_finite() || !(0.0..=100.0).contains(&result.score) {
        return Err(GatewayError::new(
            "gateway_error",
            format!("score {} outside 0-100", result.score),
        ));
    }
    if !matches!(result.letter_grade.as_str(), "A" | "B" | "C" | "D" | "F") {
        return Err(GatewayError::new(
            "gateway_error",
            format!("unknown letter grade '{}'", result.letter_grade),
        ));
    }
    Ok(result)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let rest = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
