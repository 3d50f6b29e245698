//! Uploaded file validation and filename sanitization

use crate::error::ApiError;
use unicode_normalization::UnicodeNormalization;

/// Extensions accepted by `/denoise` (compared case-insensitively)
const ALLOWED_EXTENSIONS: &[&str] = &[".wav", ".wave"];

/// Used when sanitization leaves nothing of the client's filename
const FALLBACK_FILENAME: &str = "audio.wav";

/// Names Windows reserves for devices
const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "LPT1", "LPT2", "LPT3",
];

/// One request's uploaded file, validated before anything touches disk
#[derive(Debug, Clone)]
pub struct UploadedAudio {
    filename: String,
    bytes: Vec<u8>,
}

impl UploadedAudio {
    /// Check the claimed filename and take ownership of the body bytes
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ApiError> {
        let filename = filename.into();
        validate_filename(&filename)?;
        Ok(Self { filename, bytes })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `denoised_<sanitized filename>`
    pub fn download_name(&self) -> String {
        format!("denoised_{}", secure_filename(&self.filename))
    }
}

/// Reject empty filenames and anything that is not `.wav`/`.wave`
pub fn validate_filename(filename: &str) -> Result<(), ApiError> {
    if filename.is_empty() {
        return Err(ApiError::InvalidInput("No file selected".to_string()));
    }

    let lower = filename.to_lowercase();
    if !ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return Err(ApiError::InvalidInput(
            "Only WAV files are supported".to_string(),
        ));
    }

    Ok(())
}

/// Reduce a client-supplied filename to a safe ASCII basename
///
/// The name is NFKD-folded and whatever is still non-ASCII is dropped, so
/// `café.wav` becomes `cafe.wav`. Platform path separators and whitespace
/// runs become `_`, everything outside `[A-Za-z0-9_.-]` is removed and
/// leading or trailing `.`/`_` are trimmed. Falls back to `audio.wav` when
/// nothing is left.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if is_path_separator(c) { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let mut name = cleaned.trim_matches(|c| c == '.' || c == '_').to_string();

    if cfg!(windows) {
        let stem = name.split('.').next().unwrap_or_default().to_ascii_uppercase();
        if WINDOWS_DEVICE_NAMES.contains(&stem.as_str()) {
            name = format!("_{}", name);
        }
    }

    if name.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        name
    }
}

/// A backslash only separates paths on Windows; elsewhere it is stripped
/// like any other punctuation.
fn is_path_separator(c: char) -> bool {
    c == '/' || (cfg!(windows) && c == '\\')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn rejection(filename: &str) -> String {
        let err = validate_filename(filename).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        err.to_string()
    }

    #[test]
    fn test_accepts_wav_extensions_any_case() {
        for name in ["a.wav", "b.WAV", "c.wave", "d.WaVe", "..wav"] {
            assert!(validate_filename(name).is_ok(), "{} should be accepted", name);
        }
    }

    #[test]
    fn test_rejects_other_extensions() {
        assert_eq!(rejection("notes.txt"), "Only WAV files are supported");
        assert_eq!(rejection("song.mp3"), "Only WAV files are supported");
        assert_eq!(rejection("wav"), "Only WAV files are supported");
        assert_eq!(rejection("clip.wav.exe"), "Only WAV files are supported");
    }

    #[test]
    fn test_rejects_empty_filename() {
        assert_eq!(rejection(""), "No file selected");
    }

    #[test]
    fn test_secure_filename_plain() {
        assert_eq!(secure_filename("sample.wav"), "sample.wav");
        assert_eq!(secure_filename("My Recording.WAV"), "My_Recording.WAV");
    }

    #[test]
    fn test_secure_filename_strips_paths() {
        assert_eq!(
            secure_filename("../../etc/passwd.wav"),
            "etc_passwd.wav"
        );
    }

    #[cfg(not(windows))]
    #[test]
    fn test_secure_filename_strips_backslashes_off_windows() {
        assert_eq!(
            secure_filename("C:\\Users\\me\\take 1.wav"),
            "CUsersmetake_1.wav"
        );
    }

    #[cfg(windows)]
    #[test]
    fn test_secure_filename_splits_backslashes_on_windows() {
        assert_eq!(
            secure_filename("C:\\Users\\me\\take 1.wav"),
            "C_Users_me_take_1.wav"
        );
    }

    #[test]
    fn test_secure_filename_drops_unsafe_characters() {
        assert_eq!(secure_filename("v\u{f6}ice<>|\"memo.wav"), "voicememo.wav");
        assert_eq!(secure_filename("__.hidden.wav"), "hidden.wav");
    }

    #[test]
    fn test_secure_filename_folds_accents() {
        assert_eq!(secure_filename("caf\u{e9}.wav"), "cafe.wav");
        assert_eq!(secure_filename("v\u{f6}ice.wav"), "voice.wav");
        assert_eq!(secure_filename("\u{fb01}nal take.wav"), "final_take.wav");
    }

    #[test]
    fn test_secure_filename_fallback() {
        assert_eq!(secure_filename("\u{97f3}\u{58f0}"), "audio.wav");
        assert_eq!(secure_filename("..."), "audio.wav");
    }

    #[test]
    fn test_download_name() {
        let upload = UploadedAudio::new("sample.wav", vec![1, 2, 3]).unwrap();
        assert_eq!(upload.download_name(), "denoised_sample.wav");
        assert_eq!(upload.bytes(), &[1, 2, 3]);
    }
}
