use serde::Serialize;

/// Per-serving macros for a known food.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

const fn n(calories: f64, protein: f64, carbs: f64, fat: f64) -> Nutrition {
    Nutrition {
        calories,
        protein,
        carbs,
        fat,
    }
}

/// Matched in order; the first key contained in the label wins.
pub const FOOD_TABLE: &[(&str, Nutrition)] = &[
    ("apple", n(95.0, 0.5, 25.0, 0.3)),
    ("banana", n(105.0, 1.3, 27.0, 0.4)),
    ("chicken breast", n(231.0, 43.0, 0.0, 5.0)),
    ("rice", n(130.0, 2.7, 28.0, 0.3)),
    ("salmon", n(206.0, 22.0, 0.0, 12.0)),
    ("broccoli", n(55.0, 3.7, 11.0, 0.6)),
    ("egg", n(70.0, 6.0, 0.6, 5.0)),
    ("bread", n(79.0, 3.0, 15.0, 1.0)),
    ("pasta", n(131.0, 5.0, 25.0, 1.1)),
    ("pizza", n(266.0, 11.0, 33.0, 10.0)),
];

pub const AVERAGE_MEAL: Nutrition = n(250.0, 15.0, 30.0, 8.0);

pub const PLACEHOLDER_NAME: &str = "Detected Food";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodAnalysis {
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl FoodAnalysis {
    fn new(food_name: impl Into<String>, n: Nutrition) -> Self {
        Self {
            food_name: food_name.into(),
            calories: n.calories,
            protein: n.protein,
            carbs: n.carbs,
            fat: n.fat,
        }
    }

    /// Returned when no label could be obtained.
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_NAME, AVERAGE_MEAL)
    }
}

/// Case-insensitive substring match of `label` against [`FOOD_TABLE`].
/// Unknown labels keep their name and get [`AVERAGE_MEAL`] macros.
pub fn lookup(label: &str) -> FoodAnalysis {
    let normalized = label.to_lowercase();
    FOOD_TABLE
        .iter()
        .find(|(key, _)| normalized.contains(key))
        .map(|(key, nutrition)| FoodAnalysis::new(*key, *nutrition))
        .unwrap_or_else(|| FoodAnalysis::new(label, AVERAGE_MEAL))
}
