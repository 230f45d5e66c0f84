use std::{io::Cursor, sync::Arc, thread::spawn};

use eyre::{format_err, Result};
use serde_json::{json, Value};
use slog::{debug, info, o, warn, Logger};
use switch_uart_pad::{Error, Outcome, Pad, Transport};
use tiny_http::{Header, Request, Response, Server, StatusCode};

use crate::{config::HttpConfig, request::PadRequest};

fn json_response(status: u16, body: &Value) -> Result<Response<Cursor<Vec<u8>>>> {
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|()| format_err!("invalid content type header"))?;
    Ok(Response::from_string(body.to_string())
        .with_status_code(StatusCode(status))
        .with_header(header))
}

fn dispatch<T: Transport>(pad: &Pad<T>, request: PadRequest) -> Result<Outcome, Error> {
    match request {
        PadRequest::Press(key) => pad.press(key),
        PadRequest::Release(key) => pad.release(key),
        PadRequest::Toggle(key) => pad.toggle_held(key),
        PadRequest::ClearAll => pad.clear_all(),
        PadRequest::Pointer(dx, dy) => pad.set_pointer(dx, dy),
        PadRequest::ResetPointer => pad.reset_pointer(),
    }
}

fn handle<T: Transport>(logger: &Logger, pad: &Pad<T>, req: Request) -> Result<()> {
    debug!(logger, "req"; "method" => %req.method(), "url" => req.url());

    let (status, body) = match PadRequest::parse(req.url()) {
        None => (404, json!({ "error": "not found" })),

        Some(Err(err)) => {
            info!(logger, "req.rejected"; "url" => req.url(), "error" => %err);
            (400, json!({ "error": err.to_string() }))
        }

        Some(Ok(request)) => {
            info!(logger, "req.event"; "event" => ?request);
            match dispatch(pad, request) {
                Ok(Outcome::Sent(command)) => {
                    (200, json!({ "sent": true, "command": command.bits() }))
                }
                Ok(Outcome::Unchanged) => {
                    let command = pad.snapshot().last_sent;
                    (200, json!({ "sent": false, "command": command.bits() }))
                }
                Err(err) => (502, json!({ "error": err.to_string() })),
            }
        }
    };

    req.respond(json_response(status, &body)?)?;
    Ok(())
}

fn worker<T: Transport>(logger: Logger, server: Arc<Server>, pad: Arc<Pad<T>>) -> Result<()> {
    loop {
        let req = match server.recv() {
            Ok(req) => req,
            Err(err) => {
                warn!(logger, "worker.exit"; "error" => %err);
                return Err(err.into());
            }
        };
        if let Err(err) = handle(&logger, &pad, req) {
            warn!(logger, "req.failed"; "error" => %err);
        }
    }
}

pub(crate) fn mainloop<T>(logger: Logger, pad: Arc<Pad<T>>, config: &HttpConfig) -> Result<()>
where
    T: Transport + Send + 'static,
{
    let server = Server::http(config.bind.as_str())
        .map_err(|err| format_err!("no server :< {}", err))?;
    let server = Arc::new(server);
    info!(logger, "server.bound"; "addr" => server.server_addr(), "workers" => config.workers);

    let workers: Vec<_> = (0..config.workers.max(1))
        .map(|id| {
            let logger = logger.new(o!("worker" => id));
            let server = Arc::clone(&server);
            let pad = Arc::clone(&pad);
            spawn(move || worker(logger, server, pad))
        })
        .collect();

    for thread in workers {
        thread
            .join()
            .map_err(|_| format_err!("worker panicked"))??;
    }
    Ok(())
}
