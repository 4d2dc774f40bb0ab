//! Task template and questionnaire catalog.
//!
//! The catalog pairs each yes/no onboarding question with the task template
//! it can unlock. Both sides are seeded once and read-only afterwards: the
//! recommendation engine joins responses to templates through
//! [`Question::template_id`].

use serde::{Deserialize, Serialize};

/// Identifier for a catalog task template.
pub type TemplateId = i64;

/// Identifier for a catalog question.
pub type QuestionId = i64;

/// Immutable catalog entry describing a repeatable sustainability action.
///
/// Field names are part of the JSON contract with the app frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub id: TemplateId,
    pub desc: String,
    /// Reward points granted per recorded completion.
    pub user_points: i64,
    /// Carbon saved per week of adoption, kg CO2-equivalent.
    pub carbon_savings: f64,
    /// Waste avoided per week of adoption, kg.
    pub waste_savings: f64,
    /// Completions after which an instance of this template is done.
    pub max_completions: u32,
}

/// Which literal primary answer means "already does the sustainable behavior".
///
/// Question phrasings differ: "Do you recycle?" counts "yes" as sustainable,
/// "Do you eat meat?" counts "no". The flag lets the classifier normalize
/// across both conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Answering "yes" means the behavior is not yet adopted.
    Yes,
    /// Answering "no" means the behavior is not yet adopted.
    No,
}

/// A yes/no onboarding question with a conditional difficulty follow-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    /// Template this question gates. Must resolve in the template catalog.
    pub template_id: TemplateId,
    /// Primary yes/no prompt.
    pub prompt: String,
    /// Follow-up hardness prompt, shown when the behavior is not yet adopted.
    pub followup: String,
    pub polarity: Polarity,
}

/// The six shipped onboarding questions.
pub fn builtin_questions() -> Vec<Question> {
    let questions = [
        (
            "Do you recycle at least 50% of recyclable products you use?",
            "How hard would it be for you to do that?",
            Polarity::No,
        ),
        (
            "Do you bring a bag to the supermarket?",
            "How difficult would it be for you to bring one?",
            Polarity::No,
        ),
        (
            "Do you eat meat?",
            "How challenging would it be for you to stop eating meat for a while?",
            Polarity::Yes,
        ),
        (
            "Do you fly more than twice a year?",
            "How difficult would it be for you to fly less?",
            Polarity::Yes,
        ),
        (
            "Do you avoid single-use food and drink containers and utensils?",
            "Would that be hard for you?",
            Polarity::No,
        ),
        (
            "Do you drink milk?",
            "How difficult would it be for you to switch to plant milk?",
            Polarity::Yes,
        ),
    ];

    questions
        .into_iter()
        .enumerate()
        .map(|(i, (prompt, followup, polarity))| Question {
            id: i as QuestionId + 1,
            template_id: i as TemplateId + 1,
            prompt: prompt.to_string(),
            followup: followup.to_string(),
            polarity,
        })
        .collect()
}

/// The six shipped task templates, one per builtin question.
pub fn builtin_templates() -> Vec<TaskTemplate> {
    vec![
        TaskTemplate {
            id: 1,
            desc: "Recycle 4 items".to_string(),
            user_points: 10,
            carbon_savings: 0.43,
            waste_savings: 0.40,
            max_completions: 4,
        },
        TaskTemplate {
            id: 2,
            desc: "Bring a bag to the supermarket twice".to_string(),
            user_points: 10,
            carbon_savings: 0.20,
            waste_savings: 0.20,
            max_completions: 2,
        },
        TaskTemplate {
            id: 3,
            desc: "Don't eat meat for a day".to_string(),
            user_points: 10,
            carbon_savings: 2.60,
            waste_savings: 0.00,
            max_completions: 1,
        },
        TaskTemplate {
            id: 4,
            desc: "Choose a flight that emits less carbon emissions".to_string(),
            user_points: 10,
            carbon_savings: 25.00,
            waste_savings: 0.00,
            max_completions: 1,
        },
        TaskTemplate {
            id: 5,
            desc: "Decline using a single-use food or drink container or utensil once".to_string(),
            user_points: 10,
            carbon_savings: 2.13,
            waste_savings: 0.10,
            max_completions: 1,
        },
        TaskTemplate {
            id: 6,
            desc: "Buy a carton of plant milk".to_string(),
            user_points: 10,
            carbon_savings: 1.70,
            waste_savings: 0.00,
            max_completions: 1,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_question_joins_to_a_template() {
        let questions = builtin_questions();
        let templates = builtin_templates();
        for question in &questions {
            assert!(
                templates.iter().any(|t| t.id == question.template_id),
                "question {} joins to missing template {}",
                question.id,
                question.template_id
            );
        }
    }

    #[test]
    fn builtin_ids_are_unique() {
        let questions = builtin_questions();
        let templates = builtin_templates();
        for (i, q) in questions.iter().enumerate() {
            assert!(!questions[i + 1..].iter().any(|other| other.id == q.id));
        }
        for (i, t) in templates.iter().enumerate() {
            assert!(!templates[i + 1..].iter().any(|other| other.id == t.id));
        }
    }

    #[test]
    fn template_json_uses_contract_field_names() {
        let template = &builtin_templates()[0];
        let json = serde_json::to_value(template).unwrap();
        for field in [
            "id",
            "desc",
            "user_points",
            "carbon_savings",
            "waste_savings",
            "max_completions",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
    }

    #[test]
    fn polarity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Polarity::Yes).unwrap(), "\"yes\"");
        assert_eq!(serde_json::to_string(&Polarity::No).unwrap(), "\"no\"");
    }
}
