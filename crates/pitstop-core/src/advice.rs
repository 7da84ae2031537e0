//! Canned saving advice keyed by category name

/// General tips, always offered first
pub const GENERAL_TIPS: [&str; 3] = [
    "The 50/30/20 rule: 50% for needs, 30% for wants, 20% for savings",
    "Review your subscriptions every 3 months; you may be paying for services you no longer use",
    "Pick a fixed day each week to review your expenses",
];

/// One-line tip for a category
pub fn category_tip(category: &str) -> &'static str {
    match category.to_lowercase().as_str() {
        "food" => "Plan a weekly menu and shop from a list; it saves money and cuts waste",
        "transport" => "Consider public transport or car pooling to cut costs",
        "entertainment" => "Look for free or cheap activities near you",
        "health" => "Invest in preventive care; it saves money in the long run",
        "housing" => "Check whether changing usage habits can lower electricity and water bills",
        _ => "Look for creative ways to save in this category",
    }
}

/// A few concrete steps for reducing spend in a category
pub fn category_advice(category: &str) -> &'static [&'static str] {
    match category.to_lowercase().as_str() {
        "food" => &[
            "Plan a weekly menu",
            "Shop from a list",
            "Buy on sale",
            "Cook at home instead of ordering in",
        ],
        "transport" => &[
            "Consider public transport",
            "Share rides",
            "Walk or cycle for short distances",
            "Compare fuel prices",
        ],
        "entertainment" => &[
            "Look for free activities",
            "Host friends at home",
            "Take advantage of deals",
            "Set a monthly entertainment budget",
        ],
        "housing" => &[
            "Look for savings on electricity and water",
            "Consider energy-saving upgrades",
            "Compare utility providers",
            "Check for resident discounts",
        ],
        "health" => &[
            "Invest in preventive care",
            "Compare medication prices",
            "Check your eligibility for subsidies",
            "Keep up a healthy routine",
        ],
        _ => &[
            "Look for ways to save in this category",
            "Compare prices",
            "Consider cheaper alternatives",
        ],
    }
}
