use scribebot_core::ContentSpec;

/// Assemble the generation instruction for one content spec.
///
/// Every field is embedded verbatim; empty fields pass through unchanged
/// rather than being rejected.
pub fn build_prompt(spec: &ContentSpec) -> String {
    format!(
        "Write a 900+ word blog post titled: \"{}\" that will be published directly to Webflow. \
         Write this post from the perspective of {} for an audience of {}, \
         in a {} tone. Focus on these main points: {}. \
         Include these keyphrases: {}. \
         End with this call to action: {}. \
         Structure with headings (h2), subheadings (h3), introduction, and conclusion. \
         Focus on SEO best practices and engagement. Write the complete post ready for immediate publication.",
        spec.title,
        spec.persona,
        spec.audience,
        spec.tone,
        spec.main_points,
        spec.keyphrases,
        spec.call_to_action
    )
}
