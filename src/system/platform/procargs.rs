/// Parse a `KERN_PROCARGS2` buffer into argv.
///
/// Layout: native-endian `i32` argc, the NUL-terminated exec path, NUL
/// padding, then `argc` NUL-terminated arguments (followed by the
/// environment, which is ignored).
pub fn parse_procargs2(buf: &[u8]) -> Option<Vec<String>> {
    let argc_bytes: [u8; 4] = buf.get(..4)?.try_into().ok()?;
    let argc = i32::from_ne_bytes(argc_bytes);
    if argc <= 0 {
        return None;
    }

    let rest = &buf[4..];
    let mut pos = rest.iter().position(|&b| b == 0)?;
    while pos < rest.len() && rest[pos] == 0 {
        pos += 1;
    }
    if pos >= rest.len() {
        return None;
    }

    let mut args = Vec::new();
    let mut remaining = &rest[pos..];
    while args.len() < argc as usize && !remaining.is_empty() {
        let end = remaining
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(remaining.len());
        args.push(String::from_utf8_lossy(&remaining[..end]).into_owned());
        remaining = remaining.get(end + 1..).unwrap_or(&[]);
    }

    if args.is_empty() { None } else { Some(args) }
}
