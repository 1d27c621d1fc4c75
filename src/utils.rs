/// pack strings into rows of exactly `width` bytes
///
/// each row keeps at most `width - 1` bytes of its string (cut back to a
/// character boundary) so that every row ends in at least one NUL
pub(crate) fn encode_fixed_width<S: AsRef<str>>(strings: &[S], width: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; strings.len() * width];
    if width == 0 {
        return bytes;
    }

    for (row, string) in bytes.chunks_mut(width).zip(strings) {
        let string = string.as_ref();
        let mut end = string.len().min(width - 1);
        while !string.is_char_boundary(end) {
            end -= 1;
        }
        row[..end].copy_from_slice(&string.as_bytes()[..end]);
    }

    bytes
}

/// split `bytes` into rows of `width` and decode each row up to its first NUL
pub(crate) fn decode_fixed_width(
    bytes: &[u8],
    width: usize,
) -> Result<Vec<String>, std::string::FromUtf8Error> {
    if width == 0 {
        return Ok(Vec::new());
    }

    bytes
        .chunks(width)
        .map(|row| {
            let end = row.iter().position(|b| *b == 0).unwrap_or(row.len());
            String::from_utf8(row[..end].to_vec())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_nul_padded() {
        let bytes = encode_fixed_width(&["X", "Y", "Z"], 4);
        assert_eq!(bytes, b"X\0\0\0Y\0\0\0Z\0\0\0");
        assert_eq!(decode_fixed_width(&bytes, 4).unwrap(), ["X", "Y", "Z"]);
    }

    #[test]
    fn long_strings_are_cut() {
        let bytes = encode_fixed_width(&["abcdef"], 4);
        assert_eq!(bytes, b"abc\0");
    }

    #[test]
    fn cut_respects_char_boundaries() {
        // 'é' is two bytes, cutting after byte 2 would split it
        let bytes = encode_fixed_width(&["aé"], 3);
        assert_eq!(decode_fixed_width(&bytes, 3).unwrap(), ["a"]);
    }

    #[test]
    fn unterminated_rows_decode_whole() {
        assert_eq!(decode_fixed_width(b"abcd", 4).unwrap(), ["abcd"]);
    }
}
