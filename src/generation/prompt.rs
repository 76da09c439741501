//! Audit prompt template

/// Build the audit prompt for `website`.
///
/// The template is fixed; only the website is interpolated.
pub fn audit_prompt(website: &str) -> String {
    format!(
        "As a senior automation consultant at Cyrnel Origin, analyze {website} and create a detailed \
\"AI-Powered Business Automation Audit\" with the following structure:

1. EXECUTIVE SUMMARY: 3-4 key findings on automation potential.
2. IDENTIFIED PROCESSES: 3-5 repetitive tasks suitable for automation.
3. QUICK-WIN AUTOMATIONS: Specific implementable solutions with time estimates.
4. TECHNOLOGY RECOMMENDATIONS: Appropriate tools for implementation.
5. 90-DAY ROADMAP: Phased implementation plan.
6. ROI ANALYSIS: Time and cost savings projections.

Tone: Professional, actionable, value-focused."
    )
}
