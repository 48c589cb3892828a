//! Prompt templates, one per endpoint
//!
//! Every template asks for "JSON format", but nothing downstream parses the reply.
//! Caller data is substituted verbatim; list fields use their debug rendering.

use crate::models::{NetworkDesignRequest, PolicyAnalysisRequest, ResourceOptimizationRequest};

pub fn policy_analysis_prompt(request: &PolicyAnalysisRequest) -> String {
    format!(
        "You are an AI expert in telecom policies. Provide a concise summary, risk assessment, \
         and recommendations in JSON format.\n\
         Summarize the following telecom policy in {}. Identify compliance risks and provide \
         actionable recommendations: {}",
        request.country, request.policy_text
    )
}

pub fn network_design_prompt(request: &NetworkDesignRequest) -> String {
    format!(
        "You are an AI specializing in network optimization. Provide a structured network plan, \
         cost estimate, and coverage percentage in JSON format.\n\
         Optimize network design for {} with terrain: {}. Infrastructure: {:?}. Budget: ${}.",
        request.region, request.terrain_data, request.existing_infrastructure, request.budget
    )
}

pub fn resource_allocation_prompt(request: &ResourceOptimizationRequest) -> String {
    format!(
        "You are an AI expert in telecom resource management. Provide underutilized assets, \
         suggested allocation, and cost savings in JSON format.\n\
         Optimize resource allocation in {}. Existing assets: {:?}. User demand: {}. Budget: ${}.",
        request.region, request.existing_assets, request.user_demand, request.budget
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_prompt_embeds_fields_verbatim() {
        let request = PolicyAnalysisRequest {
            country: "Brazil".to_string(),
            policy_text: "All telecom operators must register with ANATEL.".to_string(),
        };

        let prompt = policy_analysis_prompt(&request);
        assert!(prompt.contains("telecom policy in Brazil."));
        assert!(prompt.contains("All telecom operators must register with ANATEL."));
        assert!(prompt.starts_with("You are an AI expert in telecom policies."));
        assert!(prompt.contains("in JSON format"));
    }

    #[test]
    fn test_policy_prompt_keeps_special_characters() {
        let request = PolicyAnalysisRequest {
            country: "Côte d'Ivoire".to_string(),
            policy_text: "Line one\nLine {two} with \"quotes\"".to_string(),
        };

        let prompt = policy_analysis_prompt(&request);
        assert!(prompt.contains("Côte d'Ivoire"));
        assert!(prompt.contains("Line one\nLine {two} with \"quotes\""));
    }

    #[test]
    fn test_network_prompt_contains_all_fields() {
        let request = NetworkDesignRequest {
            region: "Andes".to_string(),
            terrain_data: "mountainous, sparse settlements".to_string(),
            existing_infrastructure: vec!["fiber backbone".to_string(), "3 LTE towers".to_string()],
            budget: 250_000,
        };

        let prompt = network_design_prompt(&request);
        assert!(prompt.contains("Optimize network design for Andes"));
        assert!(prompt.contains("terrain: mountainous, sparse settlements."));
        assert!(prompt.contains(r#"Infrastructure: ["fiber backbone", "3 LTE towers"]."#));
        assert!(prompt.contains("Budget: $250000."));
        assert!(prompt.contains("coverage percentage in JSON format"));
    }

    #[test]
    fn test_network_prompt_with_empty_infrastructure_and_negative_budget() {
        let request = NetworkDesignRequest {
            region: "Sahel".to_string(),
            terrain_data: "desert".to_string(),
            existing_infrastructure: Vec::new(),
            budget: -5,
        };

        let prompt = network_design_prompt(&request);
        assert!(prompt.contains("Infrastructure: []."));
        assert!(prompt.contains("Budget: $-5."));
    }

    #[test]
    fn test_resource_prompt_contains_all_fields() {
        let request = ResourceOptimizationRequest {
            region: "Nairobi".to_string(),
            existing_assets: vec!["5 macro cells".to_string(), "microwave links".to_string()],
            user_demand: "peak evening video streaming".to_string(),
            budget: 90_000,
        };

        let prompt = resource_allocation_prompt(&request);
        assert!(prompt.contains("Optimize resource allocation in Nairobi."));
        assert!(prompt.contains(r#"Existing assets: ["5 macro cells", "microwave links"]."#));
        assert!(prompt.contains("User demand: peak evening video streaming."));
        assert!(prompt.contains("Budget: $90000."));
        assert!(prompt.starts_with("You are an AI expert in telecom resource management."));
    }
}
