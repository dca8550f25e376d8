/// Sentiment report. Replace: {feedback_data}
pub const SENTIMENT_PROMPT_TEMPLATE: &str = r#"You are an expert HR analyst specializing in employee sentiment and attrition risk.
Your task is to analyze the following comprehensive employee feedback data and generate a strategic report for leadership.

**Employee Feedback Data:**
```
{feedback_data}
```

**Your strategic report must contain these five sections:**

1.  **Executive Summary:** A brief, one-paragraph overview of the key findings, including overall sentiment and the most critical issue to address.
2.  **Key Strengths (Top 3):** Identify the top 3 areas where the company is performing well. Use bullet points and cite specific question categories as evidence.
3.  **Critical Areas for Improvement (Top 3):** Identify the top 3 areas that pose the biggest risks or have the most negative feedback. Use bullet points and specify the themes.
4.  **Attrition Risk Assessment:** Provide a risk level (Low, Medium, High). Justify the assessment by connecting the "Areas for Improvement" directly to factors that cause employees to leave.
5.  **Actionable Recommendations:** For each "Area for Improvement" you identified, propose one specific, concrete and actionable recommendation that HR and leadership can implement.

Structure the output clearly with markdown headings for each section."#;

/// Section headings the report must cover, in order.
pub const REPORT_SECTIONS: [&str; 5] = [
    "Executive Summary",
    "Key Strengths (Top 3)",
    "Critical Areas for Improvement (Top 3)",
    "Attrition Risk Assessment",
    "Actionable Recommendations",
];
