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

//! Benchmarks for iacnet-codec throughput

use bytes::BytesMut;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use iacnet_codec::consts::{IAC, SB, SE, WILL};
use iacnet_codec::{DataCodec, Unescaper, escape_into};
use tokio_util::codec::{Decoder, Encoder};

// ============================================================================
// Escaping Benchmarks
// ============================================================================

fn bench_escape(c: &mut Criterion) {
    let mut group = c.benchmark_group("escape");

    for size in [64, 1024, 16384].iter() {
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_with_input(BenchmarkId::new("text", size), size, |b, &size| {
            let data: Vec<u8> = (0..size).map(|i| b'a' + (i % 26) as u8).collect();
            let mut buffer = BytesMut::with_capacity(size * 2);
            b.iter(|| {
                buffer.clear();
                escape_into(black_box(&data), &mut buffer);
            });
        });

        group.bench_with_input(BenchmarkId::new("binary", size), size, |b, &size| {
            let data: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();
            let mut buffer = BytesMut::with_capacity(size * 2);
            b.iter(|| {
                buffer.clear();
                escape_into(black_box(&data), &mut buffer);
            });
        });
    }

    group.finish();
}

// ============================================================================
// Unescaping Benchmarks
// ============================================================================

fn mixed_stream(size: usize) -> Vec<u8> {
    let mut stream = Vec::with_capacity(size + size / 8);
    while stream.len() < size {
        stream.extend_from_slice(b"some plain text ");
        stream.extend_from_slice(&[IAC, WILL, 24]);
        stream.extend_from_slice(&[IAC, IAC]);
        stream.extend_from_slice(&[IAC, SB, 31, 0, 80, 0, 24, IAC, SE]);
    }
    stream
}

fn bench_unescape(c: &mut Criterion) {
    let mut group = c.benchmark_group("unescape");

    for size in [64, 1024, 16384].iter() {
        let stream = mixed_stream(*size);
        group.throughput(Throughput::Bytes(stream.len() as u64));

        group.bench_with_input(BenchmarkId::new("unescaper", size), &stream, |b, stream| {
            let mut out = vec![0u8; stream.len()];
            b.iter(|| {
                let mut unescaper = Unescaper::new();
                unescaper.unescape(black_box(stream), &mut out)
            });
        });

        group.bench_with_input(BenchmarkId::new("codec", size), &stream, |b, stream| {
            b.iter(|| {
                let mut codec = DataCodec::new();
                let mut src = BytesMut::from(&stream[..]);
                codec.decode(black_box(&mut src)).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_codec_encode(c: &mut Criterion) {
    c.bench_function("codec_encode_line", |b| {
        let mut codec = DataCodec::new();
        let mut buffer = BytesMut::with_capacity(256);
        b.iter(|| {
            buffer.clear();
            codec
                .encode(black_box(&b"look north\xff\r\n"[..]), &mut buffer)
                .unwrap();
        });
    });
}

criterion_group!(benches, bench_escape, bench_unescape, bench_codec_encode);
criterion_main!(benches);
