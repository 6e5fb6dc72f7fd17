use thiserror::Error;

/**
    Reasons an uploaded subtitle file is refused before ffmpeg sees it.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubtitleError {
    #[error("subtitle file is empty")]
    Empty,

    #[error("subtitle file is not valid UTF-8")]
    NotUtf8,

    #[error("subtitle file contains no SRT cues")]
    NoCues,
}

/**
    Check that `data` looks like an SRT file and return its cue count.

    A cue is counted for every timing line of the form
    `00:00:01,000 --> 00:00:04,000`. A UTF-8 byte order mark and CRLF
    line endings are accepted.
*/
pub fn validate_srt(data: &[u8]) -> Result<usize, SubtitleError> {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    if data.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(SubtitleError::Empty);
    }

    let text = std::str::from_utf8(data).map_err(|_| SubtitleError::NotUtf8)?;

    let cues = text.lines().filter(|line| is_timing_line(line)).count();
    if cues == 0 {
        return Err(SubtitleError::NoCues);
    }

    Ok(cues)
}

fn is_timing_line(line: &str) -> bool {
    let Some((start, end)) = line.trim().split_once("-->") else {
        return false;
    };

    // End timestamps may be followed by position hints (X1:.. Y1:..)
    let end = end.split_whitespace().next().unwrap_or_default();
    is_timestamp(start.trim()) && is_timestamp(end)
}

/**
    `HH:MM:SS,mmm`, allowing `.` as the millisecond separator and any
    number of hour digits.
*/
fn is_timestamp(s: &str) -> bool {
    let Some((clock, millis)) = s.split_once([',', '.']) else {
        return false;
    };

    let mut parts = clock.split(':');
    let (Some(h), Some(m), Some(sec), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    let digits = |p: &str, len: Option<usize>| {
        !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()) && len.is_none_or(|l| p.len() == l)
    };

    digits(h, None) && digits(m, Some(2)) && digits(sec, Some(2)) && digits(millis, Some(3))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "1\n00:00:01,000 --> 00:00:04,000\nHello\n\n2\n00:00:05,500 --> 00:00:07,250\nWorld\n";

    #[test]
    fn counts_cues() {
        assert_eq!(validate_srt(SAMPLE.as_bytes()), Ok(2));
    }

    #[test]
    fn accepts_bom_and_crlf() {
        let mut data = b"\xEF\xBB\xBF".to_vec();
        data.extend_from_slice(SAMPLE.replace('\n', "\r\n").as_bytes());
        assert_eq!(validate_srt(&data), Ok(2));
    }

    #[test]
    fn accepts_position_hints_and_dot_millis() {
        let data = "1\n00:00:01.000 --> 00:00:02.000 X1:10 X2:20 Y1:30 Y2:40\nHi\n";
        assert_eq!(validate_srt(data.as_bytes()), Ok(1));
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(validate_srt(b""), Err(SubtitleError::Empty));
        assert_eq!(validate_srt(b"  \r\n\n"), Err(SubtitleError::Empty));
        assert_eq!(validate_srt(b"\xEF\xBB\xBF"), Err(SubtitleError::Empty));
    }

    #[test]
    fn rejects_non_utf8() {
        assert_eq!(
            validate_srt(b"1\n00:00:01,000 --> 00:00:02,000\n\xff\xfe\n"),
            Err(SubtitleError::NotUtf8)
        );
    }

    #[test]
    fn rejects_text_without_cues() {
        assert_eq!(
            validate_srt(b"just some words\nnot subtitles"),
            Err(SubtitleError::NoCues)
        );
        assert_eq!(
            validate_srt(b"1\n0:1:2,000 --> 00:00:02,000\nbad minutes\n"),
            Err(SubtitleError::NoCues)
        );
    }
}
