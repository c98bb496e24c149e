use crate::core::{PlanType, SubscriptionPlan};

pub static SUBSCRIPTION_PLANS: [SubscriptionPlan; 2] = [
    SubscriptionPlan {
        id: PlanType::Free,
        name: "Free",
        description: "Basic file conversion with ads",
        price_in_cents: 0,
        features: &[
            "Up to 5 conversions per day",
            "Max file size: 10MB",
            "Basic file formats",
            "Ad-supported",
        ],
        billing_price_id: None,
    },
    SubscriptionPlan {
        id: PlanType::Premium,
        name: "Premium",
        description: "Unlimited conversions, ad-free",
        price_in_cents: 999, // $9.99/month
        features: &[
            "Unlimited conversions",
            "Max file size: 100MB",
            "All file formats",
            "Ad-free experience",
            "Priority support",
            "Batch conversions",
        ],
        billing_price_id: Some("price_convertpro_premium_monthly"),
    },
];

pub fn all_plans() -> &'static [SubscriptionPlan] {
    &SUBSCRIPTION_PLANS
}

pub fn find_plan(id: PlanType) -> &'static SubscriptionPlan {
    match id {
        PlanType::Free => &SUBSCRIPTION_PLANS[0],
        PlanType::Premium => &SUBSCRIPTION_PLANS[1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_free_then_premium() {
        let plans = all_plans();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].id, PlanType::Free);
        assert_eq!(plans[1].id, PlanType::Premium);
        assert_eq!(plans[1].price_in_cents, 999);
        assert!(plans[0].billing_price_id.is_none());
        assert!(plans[1].billing_price_id.is_some());
    }

    #[test]
    fn test_plan_serializes_camel_case() {
        let json = serde_json::to_value(find_plan(PlanType::Free)).unwrap();
        assert_eq!(json["id"], "free");
        assert_eq!(json["priceInCents"], 0);
        assert_eq!(json["features"].as_array().unwrap().len(), 4);
        assert!(json.get("billingPriceId").is_none());
    }
}
