//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Integration tests for iacnet-client

use async_trait::async_trait;
use iacnet_client::{
    Caller, Client, ClientConfig, DataSink, DataSource, StandardCaller, dial_to_and_call,
};
use iacnet_codec::{DataReader, DataWriter};
use iacnet_service::{Context, serve};
use std::net::SocketAddr;
use std::sync::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Run the relay against an in-memory server that records everything it receives and
/// then sends `reply`.
async fn run_relay(input: &[u8], reply: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let (client_w, mut server_r) = tokio::io::duplex(1024);
    let (mut server_w, client_r) = tokio::io::duplex(1024);
    let mut writer = DataWriter::new(client_w);
    let mut reader = DataReader::new(client_r);
    let mut output = Vec::new();

    let reply = reply.to_vec();
    let server = async move {
        server_w.write_all(&reply).await.unwrap();
        let mut received = Vec::new();
        server_r.read_to_end(&mut received).await.unwrap();
        drop(server_w);
        received
    };

    let (result, received) = tokio::join!(
        StandardCaller::relay(input, &mut output, &mut writer, &mut reader),
        server
    );
    result.unwrap();
    (received, output)
}

async fn sent(input: &[u8]) -> Vec<u8> {
    run_relay(input, b"").await.0
}

async fn spawn_echo_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, None));
    address
}

// ============================================================================
// Line Relay
// ============================================================================

#[tokio::test]
async fn test_unterminated_input_is_not_sent() {
    for input in [&b""[..], b"a", b"apple", b"apple banana cherry", b"\xff", b"\xff\xff\xff"] {
        assert_eq!(sent(input).await, b"", "input {:?}", input);
    }
    assert_eq!(sent(b"apple\xff\xffbanana\xff\xffcherry").await, b"");
}

#[tokio::test]
async fn test_lines_are_sent_with_crlf() {
    assert_eq!(sent(b"a\n").await, b"a\r\n");
    assert_eq!(sent(b"apple banana cherry\n").await, b"apple banana cherry\r\n");
    assert_eq!(sent(b"a\nb\nc\n").await, b"a\r\nb\r\nc\r\n");
    assert_eq!(sent(b"apple\nbanana\ncherry").await, b"apple\r\nbanana\r\n");
}

#[tokio::test]
async fn test_crlf_input_is_not_doubled() {
    assert_eq!(sent(b"look\r\n").await, b"look\r\n");
}

#[tokio::test]
async fn test_iac_in_lines_is_escaped() {
    for n in 1..=10 {
        let mut input = vec![255u8; n];
        input.push(b'\n');
        let mut expected = vec![255u8; n * 2];
        expected.extend_from_slice(b"\r\n");
        assert_eq!(sent(&input).await, expected);
    }
    assert_eq!(
        sent(b"\xffapple\xffbanana\xffcherry\xff\n").await,
        b"\xff\xffapple\xff\xffbanana\xff\xffcherry\xff\xff\r\n"
    );
}

#[tokio::test]
async fn test_command_bytes_from_input_are_sent_as_data() {
    for verb in [251u8, 252, 253, 254] {
        assert_eq!(sent(&[255, verb, 24]).await, b"");
        assert_eq!(sent(&[255, verb, 24, b'\n']).await, vec![255, 255, verb, 24, b'\r', b'\n']);
    }
}

#[tokio::test]
async fn test_server_data_is_unescaped_to_output() {
    let (_, output) = run_relay(b"", &[b'h', 255, 251, 1, b'i', 255, 255, b'\r', b'\n']).await;
    assert_eq!(output, b"hi\xff\r\n");
}

// ============================================================================
// Client
// ============================================================================

#[tokio::test]
async fn test_client_round_trip_through_echo_server() {
    let address = spawn_echo_server().await;
    let mut client = Client::dial_to(&address.to_string()).await.unwrap();
    assert_eq!(client.peer_addr(), Some(address));

    client.write_all(b"ping\xff").await.unwrap();
    client.flush().await.unwrap();

    let mut echoed = [0u8; 5];
    client.read_exact(&mut echoed).await.unwrap();
    assert_eq!(&echoed, b"ping\xff");
    client.close().await.unwrap();
}

#[tokio::test]
async fn test_connect_with_config() {
    let address = spawn_echo_server().await;
    let config = ClientConfig::new("127.0.0.1", address.port()).with_nodelay(true);
    let client = Client::connect(&config).await.unwrap();
    assert_eq!(client.local_addr().ip(), address.ip());
}

#[tokio::test]
async fn test_refused_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let err = Client::dial_to(&address.to_string()).await.unwrap_err();
    assert!(err.is_connect_error());
}

struct Greeter {
    heard: Mutex<Vec<u8>>,
}

#[async_trait]
impl Caller for Greeter {
    async fn call(&self, _ctx: &Context, writer: &mut DataSink<'_>, reader: &mut DataSource<'_>) {
        writer.write_all(b"hi\xff\r\n").await.unwrap();
        writer.flush().await.unwrap();

        let mut buf = [0u8; 5];
        reader.read_exact(&mut buf).await.unwrap();
        self.heard.lock().unwrap().extend_from_slice(&buf);
    }
}

#[tokio::test]
async fn test_dial_to_and_call_runs_caller() {
    let address = spawn_echo_server().await;
    let caller = Greeter {
        heard: Mutex::new(Vec::new()),
    };

    dial_to_and_call(&address.to_string(), &caller).await.unwrap();
    assert_eq!(caller.heard.lock().unwrap().as_slice(), b"hi\xff\r\n");
}
