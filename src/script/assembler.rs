/*!
 * Reattaching formatting to translated text.
 */

use log::debug;

use super::format_parser::FormattedLine;

/// Delimiter between segments of the audio transcript
pub const AUDIO_DELIMITER: &str = "|||";

/// Builds output lines and the audio transcript
pub struct ResponseAssembler;

impl ResponseAssembler {
    /// Merge translated texts back into the original line structure
    ///
    /// With matching lengths each translated text replaces the text of the
    /// original line at the same index, keeping its style and alignment. With
    /// mismatched lengths (always the case for summaries) the original
    /// formatting cannot be mapped and every text becomes a plain left-aligned
    /// line.
    pub fn assemble(translated: Vec<String>, mut original: Vec<FormattedLine>) -> Vec<FormattedLine> {
        if translated.len() == original.len() {
            for (line, text) in original.iter_mut().zip(translated) {
                line.text = text;
            }
            return original;
        }

        debug!(
            "Line count changed ({} in, {} out), dropping original formatting",
            original.len(),
            translated.len()
        );
        translated.into_iter().map(FormattedLine::plain).collect()
    }

    /// Join non-empty line texts with `AUDIO_DELIMITER`
    pub fn flatten(lines: &[FormattedLine]) -> String {
        lines
            .iter()
            .filter(|line| !line.is_blank())
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join(AUDIO_DELIMITER)
    }
}
