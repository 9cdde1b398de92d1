use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    pub description: String,
    pub prep_time: String,
    pub cook_time: String,
    pub difficulty: Difficulty,
    pub calories: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub identified_ingredients: Vec<String>,
    pub recipes: Vec<Recipe>,
}

impl AnalysisResult {
    pub fn recipe_titles(&self) -> Vec<String> {
        self.recipes.iter().map(|r| r.title.clone()).collect()
    }

    /// Append the recipes of a follow-up result. The ingredients identified
    /// by the first analysis are kept; the follow-up's list is dropped.
    pub fn append_recipes(&mut self, more: AnalysisResult) {
        self.recipes.extend(more.recipes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(title: &str) -> Recipe {
        Recipe {
            title: title.to_string(),
            description: "Fluffy".to_string(),
            prep_time: "10 mins".to_string(),
            cook_time: "15 mins".to_string(),
            difficulty: Difficulty::Easy,
            calories: "350 kcal".to_string(),
            ingredients: vec!["egg".to_string()],
            instructions: vec!["Whisk".to_string()],
            tags: vec!["Vegetarian".to_string()],
        }
    }

    #[test]
    fn append_keeps_first_identified_ingredients() {
        let mut first = AnalysisResult {
            identified_ingredients: vec!["egg".to_string(), "flour".to_string()],
            recipes: vec![recipe("Pancakes")],
        };
        let more = AnalysisResult {
            identified_ingredients: vec!["milk".to_string()],
            recipes: vec![recipe("Omelette")],
        };

        first.append_recipes(more);

        assert_eq!(first.identified_ingredients, vec!["egg", "flour"]);
        assert_eq!(first.recipe_titles(), vec!["Pancakes", "Omelette"]);
    }

    #[test]
    fn serializes_with_camel_case_field_names() {
        let value = serde_json::to_value(recipe("Pancakes")).unwrap();

        assert_eq!(value["prepTime"], "10 mins");
        assert_eq!(value["cookTime"], "15 mins");
        assert_eq!(value["difficulty"], "Easy");
    }
}
