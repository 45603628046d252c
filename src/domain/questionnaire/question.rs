//! Fixed questionnaire questions and the built-in catalog.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::QuestionId;

/// Grouping tag for a questionnaire question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    MentalHealth,
    Lifestyle,
    MedicalHistory,
}

/// A single multiple-choice question of the fixed questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
    pub message: Option<String>,
    pub category: QuestionCategory,
}

impl Question {
    /// Creates a question without a helper message.
    pub fn new<S: Into<String>>(
        id: u32,
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        category: QuestionCategory,
    ) -> Self {
        Self {
            id: QuestionId::new(id),
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            message: None,
            category,
        }
    }

    /// Attaches a helper message shown under the prompt.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns true if `option` is one of the offered choices.
    pub fn offers(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

const FAMILY_HISTORY_OPTIONS: [&str; 5] = [
    "No family history",
    "One parent",
    "Both parents",
    "Siblings",
    "Multiple family members",
];

static DEFAULT_QUESTIONS: Lazy<Vec<Question>> = Lazy::new(|| {
    use QuestionCategory::*;
    vec![
        Question::new(
            1,
            "How would you rate your current stress level?",
            ["Very Low", "Low", "Moderate", "High", "Very High"],
            MentalHealth,
        )
        .with_message(
            "These first 10 questions help us understand your health profile better. \
             Understanding your stress levels helps us assess your overall health risk.",
        ),
        Question::new(
            2,
            "How would you describe your overall mood in the past month?",
            ["Excellent", "Good", "Fair", "Poor", "Very Poor"],
            MentalHealth,
        )
        .with_message("Mental health is closely linked to physical health outcomes"),
        Question::new(
            3,
            "How many hours of sleep do you typically get per night?",
            ["Less than 5 hours", "5-6 hours", "6-7 hours", "7-8 hours", "More than 8 hours"],
            Lifestyle,
        )
        .with_message("Sleep quality and duration are important indicators of health"),
        Question::new(
            4,
            "What is your current smoking status?",
            ["Never smoked", "Former smoker", "Occasional smoker", "Regular smoker", "Heavy smoker"],
            Lifestyle,
        )
        .with_message("Smoking is one of the most significant risk factors for many diseases"),
        Question::new(
            5,
            "How often do you consume alcoholic beverages?",
            [
                "Never",
                "Rarely (1-2 times/month)",
                "Occasionally (1-2 times/week)",
                "Regularly (3-4 times/week)",
                "Daily",
            ],
            Lifestyle,
        )
        .with_message("Alcohol consumption patterns can affect various health outcomes"),
        Question::new(
            6,
            "How would you describe your physical activity level?",
            [
                "Sedentary (no exercise)",
                "Light (1-2 days/week)",
                "Moderate (3-4 days/week)",
                "Active (5-6 days/week)",
                "Very active (daily exercise)",
            ],
            Lifestyle,
        )
        .with_message("Physical activity is crucial for maintaining good health"),
        Question::new(
            7,
            "Do you have any family history of heart disease?",
            FAMILY_HISTORY_OPTIONS,
            MedicalHistory,
        )
        .with_message("Family history is an important predictor of cardiovascular risk"),
        Question::new(
            8,
            "Do you have any family history of diabetes?",
            FAMILY_HISTORY_OPTIONS,
            MedicalHistory,
        )
        .with_message("Diabetes has a strong genetic component"),
        Question::new(
            9,
            "Have you been diagnosed with high blood pressure?",
            ["No", "Borderline", "Yes, controlled with medication", "Yes, uncontrolled", "Don't know"],
            MedicalHistory,
        )
        .with_message("Hypertension is a major risk factor for cardiovascular disease"),
        Question::new(
            10,
            "How would you describe your typical diet?",
            ["Very healthy", "Mostly healthy", "Mixed", "Somewhat unhealthy", "Very unhealthy"],
            Lifestyle,
        )
        .with_message("Diet plays a crucial role in overall health and disease prevention."),
    ]
});

/// The ten built-in diagnostic questions, in presentation order.
pub fn default_questions() -> Vec<Question> {
    DEFAULT_QUESTIONS.clone()
}
