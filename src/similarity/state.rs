//! Strict JSON codec for [`CtphEngine`] state.
//!
//! Serialized state is expected to come back from untrusted storage (a
//! cookie, a file, a request body). Decoding therefore rejects unknown
//! fields, missing fields and values no real session could have produced.

use tracing::warn;

use super::engine::{calc_init_block_size, CtphEngine};
use super::{B64_ALPHABET, BLOCK_SIZE_MIN};
use crate::error::{FuzzError, Result};

impl CtphEngine {
    /// Serialize the complete engine state, rolling window included.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore state produced by [`CtphEngine::to_json`].
    pub fn from_json(text: &str) -> Result<Self> {
        let engine: CtphEngine = serde_json::from_str(text).map_err(|e| {
            warn!(error = %e, "rejected serialized ctph state");
            FuzzError::from(e)
        })?;
        engine.validate().map_err(|e| {
            warn!(error = %e, "rejected serialized ctph state");
            e
        })?;
        Ok(engine)
    }

    fn validate(&self) -> Result<()> {
        let malformed = |msg: String| Err(FuzzError::MalformedState(msg));

        if self.input_len < 1 {
            return malformed(format!("input_length must be positive, got {}", self.input_len));
        }

        let max_block_size = calc_init_block_size(self.input_len as u64);
        let bs = self.block_size;
        if bs < BLOCK_SIZE_MIN
            || bs % BLOCK_SIZE_MIN != 0
            || !(bs / BLOCK_SIZE_MIN).is_power_of_two()
            || bs > max_block_size
        {
            return malformed(format!(
                "block_size {} is not a valid size for input_length {}",
                bs, self.input_len
            ));
        }

        // scanning: -1 <= index < input_length; finished: index == input_length
        let index_ok = if self.retry {
            self.index >= -1 && self.index < self.input_len
        } else {
            self.index == self.input_len
        };
        if !index_ok {
            return malformed(format!(
                "index {} out of range for input_length {} (retry: {})",
                self.index, self.input_len, self.retry
            ));
        }

        if !self.rolling_hash.is_well_formed() {
            return malformed("rolling_hash window is inconsistent".to_string());
        }

        for (name, sig) in [("sig1", &self.sig1), ("sig2", &self.sig2)] {
            if !sig.bytes().all(|b| B64_ALPHABET.contains(&b)) {
                return malformed(format!("{name} contains characters outside the alphabet"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRESH: &str = r#"{"block_size":384,"hash1":671226215,"hash2":671226215,"index":-1,"input_length":12319,"is_trigger1":false,"is_trigger2":false,"retry":true,"rolling_hash":{"x":0,"y":0,"z":0,"c":0,"size":7,"window":[0,0,0,0,0,0,0]},"sig1":"","sig2":""}"#;

    #[test]
    fn test_fresh_state_matches_schema() {
        let engine = CtphEngine::new(12319).unwrap();
        assert_eq!(engine.to_json().unwrap(), FRESH);
    }

    #[test]
    fn test_decode_known_state() {
        let engine = CtphEngine::from_json(FRESH).unwrap();
        assert_eq!(engine.input_len(), 12319);
        assert_eq!(engine.block_size(), 384);
        assert_eq!(engine, CtphEngine::new(12319).unwrap());
    }

    #[test]
    fn test_round_trip_mid_stream() {
        let mut engine = CtphEngine::new(64).unwrap();
        for b in b"The quick brown fox jumps over the lazy dog".iter().copied() {
            engine.step(b);
            let restored = CtphEngine::from_json(&engine.to_json().unwrap()).unwrap();
            assert_eq!(restored, engine);
        }
    }

    #[test]
    fn test_round_trip_finished() {
        let mut engine = CtphEngine::new(3).unwrap();
        for b in *b"abc\0" {
            engine.step(b);
        }
        assert!(engine.is_done());
        let restored = CtphEngine::from_json(&engine.to_json().unwrap()).unwrap();
        assert_eq!(restored.render().unwrap(), engine.render().unwrap());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let text = FRESH.replacen("{", r#"{"extra":1,"#, 1);
        assert!(matches!(
            CtphEngine::from_json(&text),
            Err(FuzzError::MalformedState(_))
        ));
    }

    #[test]
    fn test_unknown_nested_field_rejected() {
        let text = FRESH.replace(r#""size":7"#, r#""size":7,"w":0"#);
        assert!(CtphEngine::from_json(&text).is_err());
    }

    #[test]
    fn test_missing_field_rejected() {
        let text = FRESH.replace(r#""retry":true,"#, "");
        assert!(matches!(
            CtphEngine::from_json(&text),
            Err(FuzzError::MalformedState(_))
        ));
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let text = FRESH.replace(r#""index":-1"#, r#""index":"-1""#);
        assert!(CtphEngine::from_json(&text).is_err());
    }

    #[test]
    fn test_inconsistent_values_rejected() {
        for (from, to) in [
            (r#""input_length":12319"#, r#""input_length":0"#),
            (r#""block_size":384"#, r#""block_size":100"#),
            (r#""block_size":384"#, r#""block_size":768"#),
            (r#""index":-1"#, r#""index":-2"#),
            (r#""index":-1"#, r#""index":12319"#),
            (r#""retry":true"#, r#""retry":false"#),
            (r#""size":7"#, r#""size":8"#),
            (r#""window":[0,0,0,0,0,0,0]"#, r#""window":[0,0,0,0,0,0]"#),
            (r#""window":[0,0,0,0,0,0,0]"#, r#""window":[256,0,0,0,0,0,0]"#),
            (r#""sig1":"""#, r#""sig1":"a:b""#),
        ] {
            let text = FRESH.replace(from, to);
            assert!(
                matches!(CtphEngine::from_json(&text), Err(FuzzError::MalformedState(_))),
                "accepted {to}"
            );
        }
    }
}
