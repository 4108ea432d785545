//! Prompt templates for document analysis.

/// Default prompt for the combined document analysis pass.
///
/// The line labels and score markers requested here are a contract: the
/// response classifier routes output lines by exactly these prefixes and
/// extracts scores from the `R_score` / `O_score` lines. Changing the
/// wording of the labels breaks classification.
pub const DEFAULT_ANALYSIS_PROMPT: &str = r#"**IMPORTANT** Do not bold (**) and do not include titles and -, start each point with either ("summary:", "risk:", "opportunity:", "neutral:", or "anomaly:") and add which file it came from.
Analyze the following document text:
The documents are separated but analyse them as one interconnected unit.
Make it detailed, professional, and useful to a private equity firm.
1. Summarize the document content in 3-5 concise bullet points.
2. Identify and categorize key clauses into:
   - Risks: Potential issues or liabilities.
   - Opportunities: Potential benefits or advantages.
   - Neutral: Standard or informational clauses.
3. Highlight any inconsistencies or anomalies in the data or agreements.
Also include a risk and opportunity score from a scale of 1 to 10 in the format ("R_score:", "O_score:") **IMPORTANT** each on its own line at the bottom.

Document:
{content}"#;

/// System-role framing for the analysis request.
pub const SYSTEM_PROMPT: &str = "You are an expert document analyzer.";
