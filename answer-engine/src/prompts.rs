//! Centralised prompt texts; kept simple and robust.

/// System prompt for the generative answer composer.
///
/// The claims passed alongside are already pre-tagged, so grounding stays
/// auditable regardless of what the model does with them.
pub const ANSWER_COMPOSER: &str = "\
You are composing a concise, well-structured answer using ONLY the provided claims.
Do NOT introduce any new facts. Every sentence must include at least one of the
bracketed citations already attached to each claim (e.g., [arXiv:2508.12345, 3.1]).
Write clearly for a mathematically sophisticated reader.
";

/// System prompt for two-hop query expansion.
pub const REFLECT_2HOP: &str = "\
You expand the user's question into up to 3 short follow-up queries that could
retrieve more relevant passages (two-hop reasoning). Return ONLY a JSON array
of strings, e.g.:

[\"definition of Neron-Severi group\", \"Picard group mod algebraic equivalence\", \"relationship with divisor class group\"]
";
