//! Deterministic text used whenever generated text is unavailable.
//!
//! Templates may contain `{field}` placeholders. Unknown placeholders are
//! left in place rather than blanked out.

use mentor_types::{MisconceptionCode, NonEmptyStaticStr, SimulationSnapshot};
use regex::Regex;
use std::sync::OnceLock;

pub const NEUTRAL_DEFAULT: NonEmptyStaticStr =
    NonEmptyStaticStr::new("Try adjusting the parameters and observe what changes.");

pub const GENERIC_RESULT: NonEmptyStaticStr =
    NonEmptyStaticStr::new("The observations matched expected theoretical values.");

const GENERIC_VIVA: [&str; 3] = [
    "Which variable had the largest effect on your results, and why?",
    "What sources of error could have affected your measurements?",
    "How would you extend this experiment to test your conclusion further?",
];

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{(\w+)\}").expect("valid placeholder regex"))
}

/// Fill `{key}` placeholders from `lookup`.
pub fn interpolate(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    placeholder()
        .replace_all(template, |caps: &regex::Captures<'_>| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Canonical family key for the lab identifiers the front end uses.
fn family_key(simulation: &str) -> String {
    let key = simulation.trim().to_ascii_lowercase();
    match key.as_str() {
        "ohm-law" | "ohms-law" => "circuit".to_string(),
        "enzyme-kinetics" => "enzyme".to_string(),
        _ => key,
    }
}

#[must_use]
pub fn intervention_template(code: &MisconceptionCode) -> Option<&'static str> {
    let template = match code.as_str() {
        "approaching_overload" => {
            "The current is {current} A and climbing. What would happen to a real wire carrying that much current?"
        }
        "overload_triggered" => {
            "The circuit overloaded. Using I = V/R, which change pushed the current past the safe limit?"
        }
        "added_too_fast" => {
            "The pH is already {pH} after only {baseVolume} mL of base. Why does adding base slowly matter near the equivalence point?"
        }
        "endpoint_missed" => {
            "You went past the endpoint. What happens to pH once all the acid has been neutralized?"
        }
        "approaching_denaturation" => {
            "The temperature is {temperature} degrees. What happens to an enzyme's 3D structure as it gets this hot?"
        }
        "denaturation_triggered" => {
            "The enzyme denatured. Enzymes are proteins, so what did the heat do to their active site?"
        }
        _ => return None,
    };
    Some(template)
}

/// Display text for an evaluation whose message came back blank.
#[must_use]
pub fn render_intervention(
    code: Option<&MisconceptionCode>,
    snapshot: &SimulationSnapshot,
) -> String {
    code.and_then(intervention_template)
        .map_or_else(
            || NEUTRAL_DEFAULT.as_str().to_string(),
            |template| interpolate(template, |key| snapshot.display_value(key)),
        )
}

/// Maps a simulation-reported failure name onto a hint key.
#[must_use]
pub fn failure_key(failure_name: &str) -> Option<&'static str> {
    let name = failure_name.to_ascii_uppercase();
    let key = if name.contains("OVERLOAD") || name.contains("OVERVOLTAGE") {
        "OVERLOAD"
    } else if name.contains("SHORT") {
        "SHORT_CIRCUIT"
    } else if name.contains("OVERSHOOT") {
        "OVERSHOOT"
    } else if name.contains("ZERO") {
        "ZERO_RANGE"
    } else if name.contains("ANGLE") {
        "LARGE_ANGLE"
    } else if name.contains("PH") || name.contains("EXTREME") {
        "PH_EXTREME"
    } else if name.contains("ENZYME") || name.contains("DENAT") {
        "ENZYME_DENATURATION"
    } else {
        return None;
    };
    Some(key)
}

#[must_use]
pub fn failure_hint(failure_name: &str) -> String {
    let hint = match failure_key(failure_name) {
        Some("OVERLOAD") => {
            "What happens when current exceeds the safe limit? Think about I = V/R. What made the current so high?"
        }
        Some("SHORT_CIRCUIT") => {
            "What does a very low resistance do to current flow? Can you recall the relationship I = V/R?"
        }
        Some("ZERO_RANGE") => {
            "Why does the projectile not travel any distance? What angle would give zero horizontal component?"
        }
        Some("LARGE_ANGLE") => {
            "At very steep angles, where does most of the velocity go: horizontal or vertical?"
        }
        Some("OVERSHOOT") => {
            "What happens when velocity is extremely high? Is there a practical limit in real experiments?"
        }
        Some("PH_EXTREME") => {
            "You've added too much base. What happens to pH beyond the equivalence point?"
        }
        Some("ENZYME_DENATURATION") => {
            "Enzymes are proteins. What happens to their 3D structure at very high temperatures?"
        }
        _ => return format!("Something went wrong ({}). What caused it?", failure_name.trim()),
    };
    hint.to_string()
}

#[must_use]
pub fn danger_hint(simulation: &str) -> &'static str {
    match family_key(simulation).as_str() {
        "circuit" => {
            "Your current is getting dangerously high. What would happen to a physical wire at this current level?"
        }
        "projectile-motion" => {
            "The angle is getting very steep. How does this affect the horizontal vs vertical components?"
        }
        "titration" => {
            "You're approaching the equivalence point rapidly. Why is it important to add base slowly near this point?"
        }
        "reaction-rate" => {
            "The temperature is very high. At what point do reaction rates stop increasing with temperature?"
        }
        "enzyme" => {
            "The temperature is nearing the enzyme's limit. What happens to a protein's shape as it heats up?"
        }
        _ => "You're approaching dangerous values. What might happen?",
    }
}

#[must_use]
pub fn ask_ai_hint(simulation: &str) -> &'static str {
    match family_key(simulation).as_str() {
        "circuit" => {
            "Think about Ohm's Law: V = IR. If you know any two of voltage, current, and resistance, you can find the third. What are you trying to achieve?"
        }
        "projectile-motion" => {
            "The key variables are angle, velocity, range, and height. Range = v²sin(2θ)/g. What pattern do you notice?"
        }
        "titration" => {
            "In a strong acid-strong base titration, the equivalence point is at pH 7. The curve is steepest near this point. What does that tell you?"
        }
        "optics-bench" => {
            "The lens equation is 1/f = 1/v - 1/u. Try predicting image distance before measuring it."
        }
        "reaction-rate" => {
            "Reaction rate depends on temperature and concentration. Doubling temperature roughly doubles rate. Why?"
        }
        _ => {
            "Think about the relationship between your variables. What happens when you change one?"
        }
    }
}

#[must_use]
pub fn result_template(simulation: &str) -> Option<&'static str> {
    let text = match family_key(simulation).as_str() {
        "circuit" => {
            "The experiment confirms Ohm's Law: current is directly proportional to voltage and inversely proportional to resistance (I = V/R)."
        }
        "projectile-motion" => {
            "The experiment demonstrates that maximum range occurs at 45°, consistent with R = v²sin(2θ)/g."
        }
        "titration" => {
            "The titration curve shows a sharp pH jump at the equivalence point, confirming stoichiometric neutralization."
        }
        "optics-bench" => "The observations verify the thin lens equation (1/f = 1/v - 1/u).",
        "reaction-rate" => {
            "Reaction rate increases with temperature and concentration, consistent with collision theory."
        }
        "enzyme" => {
            "Enzyme activity rose with temperature up to an optimum and then fell sharply as the enzyme denatured."
        }
        "logic-gates" => {
            "Truth tables for all basic gates were verified, confirming Boolean algebra principles."
        }
        "flame-test" => {
            "Different elements produced characteristic flame colours due to electron energy transitions."
        }
        "periodic-table" => {
            "Periodic trends in atomic radius, ionization energy, and electronegativity were confirmed."
        }
        "microscope" => {
            "Higher magnification revealed finer cellular details but reduced the field of view."
        }
        "cell-structure" => {
            "Key organelles were identified and their functions matched theoretical descriptions."
        }
        "mitosis" => {
            "All stages of mitotic division were observed in sequence from prophase to cytokinesis."
        }
        "anatomy" => {
            "The spatial arrangement of organ systems was explored and their interconnections understood."
        }
        _ => return None,
    };
    Some(text)
}

/// Three static viva questions for `simulation`, or a generic set.
#[must_use]
pub fn viva_questions(simulation: &str) -> [&'static str; 3] {
    match family_key(simulation).as_str() {
        "circuit" => [
            "Explain Ohm's Law and how changing resistance affects current in a circuit.",
            "What is the relationship between voltage, current, and power? Derive P = V²/R.",
            "Why do we use fuses and circuit breakers in real electrical circuits?",
        ],
        "titration" => [
            "What is the equivalence point in a titration and how do you identify it?",
            "Explain why pH changes slowly at first, then rapidly near the equivalence point.",
            "What role does an indicator like phenolphthalein play in acid-base titrations?",
        ],
        "enzyme" => [
            "Describe the Michaelis-Menten model and explain what Km represents.",
            "Why does enzyme activity decrease above the optimal temperature?",
            "How does substrate concentration affect reaction rate at low vs high concentrations?",
        ],
        "pendulum" => [
            "Derive the period formula T = 2π√(L/g) from first principles.",
            "Why does the simple pendulum formula become inaccurate at large angles?",
            "How would the period change if you took this pendulum to the Moon (g = 1.6 m/s²)?",
        ],
        "gravity" => [
            "State Newton's Law of Universal Gravitation and explain each variable.",
            "How does doubling the distance between two objects affect gravitational force?",
            "What is orbital velocity and how does it relate to gravitational force?",
        ],
        _ => GENERIC_VIVA,
    }
}
