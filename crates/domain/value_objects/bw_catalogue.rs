use serde::Serialize;

use crate::domain::value_objects::enums::bw_types::BwType;

/// Static description of a business wall type, as shown during onboarding.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BwTypeInfo {
    pub bw_type: BwType,
    pub name: &'static str,
    pub description: &'static str,
    pub free: bool,
    pub manager_role: &'static str,
    /// Quantity the paid tariff depends on. `None` for free types.
    pub pricing_field: Option<&'static str>,
    pub pricing_label: Option<&'static str>,
}

/// Subscription terms recorded for free business walls.
pub const FREE_PRICING_FIELD: &str = "N/A";
pub const FREE_PRICING_TIER: &str = "N/A";

pub fn bw_type_info(bw_type: BwType) -> BwTypeInfo {
    match bw_type {
        BwType::Media => BwTypeInfo {
            bw_type,
            name: "Business Wall for Media",
            description: "Pour les organes de presse reconnus.",
            free: true,
            manager_role: "PR Manager",
            pricing_field: None,
            pricing_label: None,
        },
        BwType::Micro => BwTypeInfo {
            bw_type,
            name: "Business Wall for Micro",
            description: "Pour les micro-entreprises de presse travaillant pour des organes de presse reconnus.",
            free: true,
            manager_role: "PR Manager",
            pricing_field: None,
            pricing_label: None,
        },
        BwType::CorporateMedia => BwTypeInfo {
            bw_type,
            name: "Business Wall for Corporate Media",
            description: "Pour les médias d'entreprise et institutionnels.",
            free: true,
            manager_role: "PR Manager",
            pricing_field: None,
            pricing_label: None,
        },
        BwType::Union => BwTypeInfo {
            bw_type,
            name: "Business Wall for Union",
            description: "Pour les syndicats ou fédérations de la presse ou des médias, clubs de la presse ou associations de journalistes.",
            free: true,
            manager_role: "Press Manager",
            pricing_field: None,
            pricing_label: None,
        },
        BwType::Academics => BwTypeInfo {
            bw_type,
            name: "Business Wall for Academics",
            description: "Pour les établissements de recherche ou d'enseignement supérieur.",
            free: true,
            manager_role: "PR Manager",
            pricing_field: None,
            pricing_label: None,
        },
        BwType::Pr => BwTypeInfo {
            bw_type,
            name: "Business Wall for PR",
            description: "Pour les agences de relations presse et les consultants indépendants.",
            free: false,
            manager_role: "PR Manager",
            pricing_field: Some("client_count"),
            pricing_label: Some("Nombre de clients représentés"),
        },
        BwType::LeadersExperts => BwTypeInfo {
            bw_type,
            name: "Business Wall for Leaders & Experts",
            description: "Pour les entreprises, associations, experts et leaders d'opinion.",
            free: false,
            manager_role: "PR Manager",
            pricing_field: Some("employee_count"),
            pricing_label: Some("Nombre de salariés"),
        },
        BwType::Transformers => BwTypeInfo {
            bw_type,
            name: "Business Wall for Transformers",
            description: "Pour les acteurs de l'innovation et de la transformation numérique.",
            free: false,
            manager_role: "PR Manager",
            pricing_field: Some("employee_count"),
            pricing_label: Some("Nombre de salariés"),
        },
    }
}

pub fn catalogue() -> Vec<BwTypeInfo> {
    BwType::ALL.into_iter().map(bw_type_info).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_flag_matches_type() {
        for info in catalogue() {
            assert_eq!(info.free, info.bw_type.is_free(), "{}", info.bw_type);
        }
    }

    #[test]
    fn paid_types_declare_a_pricing_field() {
        for info in catalogue() {
            assert_eq!(info.pricing_field.is_some(), !info.free, "{}", info.bw_type);
            assert_eq!(info.pricing_label.is_some(), !info.free, "{}", info.bw_type);
        }
    }

    #[test]
    fn pr_is_priced_per_client() {
        assert_eq!(bw_type_info(BwType::Pr).pricing_field, Some("client_count"));
        assert_eq!(
            bw_type_info(BwType::Transformers).pricing_field,
            Some("employee_count")
        );
    }
}
