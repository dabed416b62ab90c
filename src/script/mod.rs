/*!
 * Screenplay text handling around the engines.
 *
 * - `format_parser`: line splitting and style/alignment classification
 * - `idioms`: idiom dictionary and case-insensitive substitution
 * - `metadata`: word/token counts and duration estimates
 * - `assembler`: formatting reconciliation and audio transcript
 */

pub mod assembler;
pub mod format_parser;
pub mod idioms;
pub mod metadata;

pub use self::assembler::{AUDIO_DELIMITER, ResponseAssembler};
pub use self::format_parser::{FormatParser, FormattedLine, LineAlign, LineStyle};
pub use self::idioms::IdiomMap;
pub use self::metadata::{MetadataCalculator, TextMetadata};
