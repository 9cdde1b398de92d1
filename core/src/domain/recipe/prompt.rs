/// System-level persona attached to every recipe request.
pub const CHEF_PERSONA: &str = "You are a world-class Michelin star chef who specializes in home cooking \
and reducing food waste. You are creative, encouraging, and precise.";

const RECIPE_INSTRUCTIONS: &str = "Analyze these images of a user's refrigerator, pantry, and freezer.
1. Identify all visible food ingredients.
2. Based on these ingredients (and assuming common pantry staples like oil, salt, pepper, flour, sugar are available), generate 3-4 distinct, delicious recipes.
3. Ensure the recipes are practical and appetizing.";

/// Build the instruction text. The exclusion clause is only present when
/// `exclude_titles` is non-empty and names every title verbatim.
pub fn build_recipe_prompt(exclude_titles: &[String]) -> String {
    let mut prompt = RECIPE_INSTRUCTIONS.to_string();

    if !exclude_titles.is_empty() {
        prompt.push_str(&format!(
            "\n\nIMPORTANT: Do NOT suggest the following recipes again: {}.\n\
             Please suggest completely different dishes that provide variety.",
            exclude_titles.join(", ")
        ));
    }

    prompt
}
