use bitflags::bitflags;

bitflags! {
    /// Switches that change how the annotator treats a sentence.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AnnotatorFlags: u16 {
        /// Run the normalizer passes before resolution.
        const NORMALIZE = 1 << 0;
        /// Restrict sentiment lookup by coarse POS.
        const POS_LOOKUP_SENTIMENT = 1 << 1;
        /// Restrict shifter lookup by coarse POS.
        const POS_LOOKUP_SHIFTER = 1 << 2;
        /// Require shifter and target polarity to be compatible.
        const ORIENTATION_CHECK = 1 << 3;
        /// Keep neutral lexicon rows.
        const INCLUDE_NEUTRAL = 1 << 4;
        /// Expand MWE rows with pronoun/article alternatives.
        const FLEXIBLE_MWES = 1 << 5;
    }
}

impl Default for AnnotatorFlags {
    fn default() -> Self {
        AnnotatorFlags::NORMALIZE
            | AnnotatorFlags::POS_LOOKUP_SENTIMENT
            | AnnotatorFlags::POS_LOOKUP_SHIFTER
            | AnnotatorFlags::ORIENTATION_CHECK
            | AnnotatorFlags::FLEXIBLE_MWES
    }
}
