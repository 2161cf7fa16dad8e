pub mod server;
pub use server::*;

pub mod request;
pub use request::*;

pub mod response;
pub use response::*;

pub mod client;
pub use client::*;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_simple_http_request() {
        // Port 0 lets the OS pick a free port
        let server = HttpServer::new("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap().to_string();

        let handle = std::thread::spawn(move || {
            server
                .serve_once(|req| Response::ok_with_body(req.body))
                .unwrap()
        });

        let mut client = HttpClient::new(&addr).expect("Failed to connect client");
        let resp = client
            .send("POST", "/", "{\"content\": \"Hello\"}")
            .expect("Failed to communicate with server");

        assert_eq!(resp.status, Some(200));
        assert_eq!(resp.body, "{\"content\": \"Hello\"}");

        handle.join().unwrap();
    }

    #[test]
    fn test_malformed_request_is_rejected() {
        use std::io::{Read, Write};

        let server = HttpServer::new("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap();
        let handle = std::thread::spawn(move || server.serve_once(|_| Response::ok()).unwrap());

        let mut stream = std::net::TcpStream::connect(addr).unwrap();
        stream.write_all(b"\x01\x02 garbage\r\n\r\n").unwrap();
        let mut answer = String::new();
        stream.read_to_string(&mut answer).unwrap();

        assert!(answer.starts_with("HTTP/1.1 400 Bad Request"));
        handle.join().unwrap();
    }
}
