//! Fake window manager helpers for tests

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::framer::{decode_header, encode_request, HEADER_LEN};

/// Write one framed message as i3 would
pub(crate) async fn write_message<W>(peer: &mut W, message_type: i32, payload: &[u8])
where
    W: AsyncWrite + Unpin,
{
    let message = encode_request(message_type, payload).unwrap();
    peer.write_all(&message).await.unwrap();
}

/// Read one framed request as i3 would, returning its type and payload
pub(crate) async fn read_request<R>(peer: &mut R) -> (i32, Vec<u8>)
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_LEN];
    peer.read_exact(&mut header).await.unwrap();
    let header = decode_header(&header);
    assert_eq!(&header.magic, b"i3-ipc");

    let mut payload = vec![0u8; header.length as usize];
    peer.read_exact(&mut payload).await.unwrap();
    (header.message_type, payload)
}

/// A `window` event payload with the given change and geometry
pub(crate) fn window_event(change: &str, width: i64, height: i64) -> String {
    serde_json::json!({
        "change": change,
        "container": {
            "id": 94_279_033_542_512_u64,
            "type": "con",
            "focused": true,
            "rect": { "x": 0, "y": 0, "width": width, "height": height },
            "window_rect": { "x": 2, "y": 0, "width": width, "height": height },
        }
    })
    .to_string()
}
