use serde_json::json;

/// Returns the JSON schema the model must follow for recipe suggestions
pub fn get_recipe_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "identifiedIngredients": {
                "type": "array",
                "description": "List of food ingredients identified in the images.",
                "items": { "type": "string" }
            },
            "recipes": {
                "type": "array",
                "description": "A list of delicious recipes that can be made primarily using the identified ingredients.",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "description": {
                            "type": "string",
                            "description": "A mouth-watering short description of the dish."
                        },
                        "prepTime": { "type": "string", "description": "e.g. 15 mins" },
                        "cookTime": { "type": "string", "description": "e.g. 30 mins" },
                        "difficulty": {
                            "type": "string",
                            "enum": ["Easy", "Medium", "Hard"]
                        },
                        "calories": {
                            "type": "string",
                            "description": "Approximate calories per serving"
                        },
                        "ingredients": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Full list of ingredients needed, including pantry staples."
                        },
                        "instructions": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Step-by-step cooking instructions."
                        },
                        "tags": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Tags like 'Vegetarian', 'Quick', 'Gluten-Free', etc."
                        }
                    },
                    "required": [
                        "title", "description", "prepTime", "cookTime", "difficulty",
                        "ingredients", "instructions", "tags", "calories"
                    ]
                }
            }
        },
        "required": ["identifiedIngredients", "recipes"]
    })
}
