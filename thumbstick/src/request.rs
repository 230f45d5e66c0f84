use switch_uart_pad::{Error, Key, Result};

/// One inbound control event, decoded from `/{action}/{key}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PadRequest {
    Press(Key),
    Release(Key),
    Toggle(Key),
    ClearAll,
    Pointer(i32, i32),
    ResetPointer,
}

impl PadRequest {
    /// `None` if the path does not have the `/{action}/{key}` shape at all
    pub(crate) fn parse(url: &str) -> Option<Result<Self>> {
        let path = url.split('?').next().unwrap_or_default();
        let mut segments = path.trim_start_matches('/').split('/');
        let (action, key) = match (segments.next(), segments.next(), segments.next()) {
            (Some(action), Some(key), None) if !action.is_empty() => (action, key),
            _ => return None,
        };

        Some(match action {
            "H" => key.parse().map(Self::Press),
            "R" => key.parse().map(Self::Release),
            "T" => key.parse().map(Self::Toggle),
            "A" => Ok(Self::ClearAll),
            "D" => parse_delta(key).map(|(dx, dy)| Self::Pointer(dx, dy)),
            "C" => Ok(Self::ResetPointer),
            _ => Err(Error::UnknownAction(action.to_owned())),
        })
    }
}

fn parse_delta(s: &str) -> Result<(i32, i32)> {
    let bad = || Error::BadPointer(s.to_owned());
    let (dx, dy) = s.split_once(',').ok_or_else(bad)?;
    Ok((
        dx.trim().parse().map_err(|_| bad())?,
        dy.trim().parse().map_err(|_| bad())?,
    ))
}
