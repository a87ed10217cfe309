//! Prompt text for every generation call the mentor makes.

use mentor_types::{
    ChallengeRequest, HintRequest, MisconceptionCode, NonEmptyStaticStr, ReportRequest,
    SimulationSnapshot,
};
use serde_json::{Value, json};

pub const SOCRATIC_DIRECTIVE: NonEmptyStaticStr = NonEmptyStaticStr::new(
    "You are a Socratic science tutor watching a student's virtual lab experiment. \
     Never reveal the answer or the correct parameter values. \
     Ask exactly one short guiding question, under 30 words. \
     Reference at least one concrete numeric value from the simulation state. \
     Keep an encouraging, curious tone.",
);

pub const REPORT_DIRECTIVE: NonEmptyStaticStr =
    NonEmptyStaticStr::new("You are a science lab report writer.");

pub const CHALLENGE_DIRECTIVE: NonEmptyStaticStr = NonEmptyStaticStr::new(
    "You design short numeric lab challenges. Respond with a single JSON object and nothing else.",
);

const MAX_REPORT_OBSERVATIONS: usize = 3;

/// User payload for an intervention: the misconception plus the raw snapshot.
#[must_use]
pub fn intervention_payload(snapshot: &SimulationSnapshot, code: &MisconceptionCode) -> String {
    json!({
        "misconception": code.as_str(),
        "simulation": snapshot.fields(),
    })
    .to_string()
}

fn context_json(request: &HintRequest) -> String {
    Value::Object(request.context.clone()).to_string()
}

pub fn failure_hint_prompt(request: &HintRequest, failure_name: &str) -> String {
    format!(
        "The student's {simulation} experiment just failed with \"{failure_name}\".\n\
         Current parameters: {params}.\n\n\
         Ask one Socratic question (max 2 sentences) that helps them discover what caused \
         the failure. Do not state the cause directly.",
        simulation = request.simulation,
        params = context_json(request),
    )
}

pub fn danger_hint_prompt(request: &HintRequest) -> String {
    format!(
        "The student's {simulation} experiment is approaching dangerous values.\n\
         Current parameters: {params}.\n\n\
         Ask one Socratic question (max 2 sentences) that makes them predict what will happen \
         if they continue.",
        simulation = request.simulation,
        params = context_json(request),
    )
}

pub fn ask_ai_prompt(request: &HintRequest) -> String {
    let question = request
        .student_message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or("Can you help me understand this experiment?");
    format!(
        "You are a Socratic science tutor for a {simulation} virtual lab.\n\
         The student asks: \"{question}\"\n\
         Current parameters: {params}.\n\n\
         Give a helpful Socratic response (max 3 sentences). Guide them with a question, \
         don't give the direct answer. Relate to the current parameter values.",
        simulation = request.simulation,
        params = context_json(request),
    )
}

pub fn report_result_prompt(request: &ReportRequest) -> String {
    let observations: Vec<Value> = request
        .observations
        .iter()
        .take(MAX_REPORT_OBSERVATIONS)
        .cloned()
        .collect();
    format!(
        "Write a RESULT paragraph (3-4 sentences) for a {simulation} experiment.\n\n\
         Student's observations: {observations}\n\
         Failures triggered: {failures}\n\
         Duration: {duration}s, Score: {score}/100\n\n\
         Write in third person past tense (\"The experiment showed...\").\n\
         Be specific about the actual values observed. Include one key formula.\n\
         Keep it under 80 words.",
        simulation = request.simulation,
        observations = Value::from(observations),
        failures = Value::from(request.failures.clone()),
        duration = request.duration,
        score = request.score,
    )
}

pub fn viva_prompt(request: &ReportRequest) -> String {
    format!(
        "Write three viva (oral exam) questions for a student who just finished a {simulation} \
         virtual lab.\n\
         Their observations: {observations}\n\n\
         Return ONLY a JSON array of three question strings.",
        simulation = request.simulation,
        observations = Value::from(request.observations.clone()),
    )
}

pub fn challenge_prompt(request: &ChallengeRequest) -> String {
    format!(
        "Generate a physics/chemistry lab challenge for the \"{simulation}\" simulation.\n\
         Skill level: {skill}\n\
         Already completed challenge IDs: {completed}\n\n\
         Return ONLY valid JSON (no markdown) with these exact keys:\n\
         {{\n  \"id\": \"unique-id\",\n  \"title\": \"Short title\",\n  \
         \"description\": \"One sentence challenge description\",\n  \
         \"target_key\": \"the variable to hit (e.g. current, range, ph)\",\n  \
         \"target_value\": 0.03,\n  \"target_unit\": \"A\",\n  \"tolerance\": 5,\n  \
         \"hint\": \"One hint sentence\",\n  \
         \"proof\": \"Mathematical proof why the answer works\",\n  \
         \"fixed_params\": {{\"voltage\": 6}},\n  \
         \"compute\": \"inputs.voltage / inputs.resistance\"\n}}",
        simulation = request.simulation,
        skill = request.skill_level,
        completed = json!(request.completed_challenges),
    )
}
