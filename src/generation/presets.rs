//! Fixed parameter presets for the three pipeline calls and question answering.

use super::{GenerationParams, SamplingConfig};

/// Long, deterministic output for the paper summary.
pub fn summary_params() -> GenerationParams {
    GenerationParams {
        max_output_tokens: 800,
        min_output_tokens: 600,
        sampling: SamplingConfig {
            num_beams: 5,
            repetition_penalty: 1.2,
            temperature: 0.7,
            top_p: 0.9,
            do_sample: false,
            no_repeat_ngram_size: 3,
        },
    }
}

/// Short, sampled output with a stronger repetition penalty for point lists.
pub fn points_params() -> GenerationParams {
    GenerationParams {
        max_output_tokens: 150,
        min_output_tokens: 0,
        sampling: SamplingConfig {
            num_beams: 4,
            repetition_penalty: 1.3,
            temperature: 0.6,
            top_p: 1.0,
            do_sample: true,
            no_repeat_ngram_size: 3,
        },
    }
}

/// Short deterministic answers to questions about a paper.
pub fn answer_params() -> GenerationParams {
    GenerationParams {
        max_output_tokens: 200,
        min_output_tokens: 100,
        sampling: SamplingConfig {
            num_beams: 4,
            repetition_penalty: 1.0,
            temperature: 0.7,
            top_p: 1.0,
            do_sample: false,
            no_repeat_ngram_size: 3,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_preset_is_longer_and_deterministic() {
        let summary = summary_params();
        let points = points_params();
        assert!(summary.max_output_tokens > points.max_output_tokens);
        assert!(summary.sampling.num_beams > points.sampling.num_beams);
        assert!(!summary.sampling.do_sample);
        assert!(points.sampling.do_sample);
        assert!(points.sampling.repetition_penalty > summary.sampling.repetition_penalty);
    }

    #[test]
    fn presets_respect_length_bounds() {
        for params in [summary_params(), points_params(), answer_params()] {
            assert!(params.min_output_tokens <= params.max_output_tokens);
        }
    }
}
