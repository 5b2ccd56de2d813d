//! Serialization into byte buffers

use std::{borrow::Cow, io};

/// Trait for writing a wire representation into a byte buffer.
///
/// Implemented for the codec types ([`Args`](crate::Args), [`Uri`](crate::Uri),
/// [`Cookie`](crate::Cookie)), for strings, bytes and integers.
///
/// # Example
/// ```
/// use maker_wire::WriteBuffer;
///
/// struct Token(String);
///
/// impl WriteBuffer for Token {
///     fn write_to(&self, buffer: &mut Vec<u8>) {
///         buffer.extend_from_slice(self.0.as_bytes())
///     }
/// }
///
/// let mut buffer = Vec::new();
/// Token("abc".into()).write_to(&mut buffer);
/// 150u32.write_to(&mut buffer);
/// assert_eq!(buffer, b"abc150");
/// ```
pub trait WriteBuffer {
    /// Appends the value's representation to the buffer.
    fn write_to(&self, buffer: &mut Vec<u8>);
}

macro_rules! impl_write_buffer {
    (bytes, $conn:expr => $($t:ty),*) => {
        $(impl WriteBuffer for $t {
            #[inline] fn write_to(&self, buffer: &mut Vec<u8>) {
                let closure = $conn;
                closure(self, buffer);
            }
        })*
    };
    (number($type:ty), $conn:expr => $($t:ty),*) => {
        $(impl WriteBuffer for $t {
            #[inline] fn write_to(&self, buffer: &mut Vec<u8>) {
                $conn(*self as $type, buffer);
            }
        })*
    };
}

impl<T: WriteBuffer + ?Sized> WriteBuffer for &T {
    #[inline]
    fn write_to(&self, buffer: &mut Vec<u8>) {
        T::write_to(*self, buffer);
    }
}
impl_write_buffer! {
    bytes, |value: &str, buffer: &mut Vec<u8>| {
        buffer.extend_from_slice(value.as_bytes());
    } => str, String, Cow<'_, str>
}
impl_write_buffer! {
    bytes, |value: &[u8], buffer: &mut Vec<u8>| {
        buffer.extend_from_slice(value);
    } => [u8], Vec<u8>, Cow<'_, [u8]>
}
impl<const N: usize> WriteBuffer for [u8; N] {
    #[inline]
    fn write_to(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(self);
    }
}
impl_write_buffer! {
    number(u64), write_u64 => u8, u16, u32, u64, usize
}
impl_write_buffer! {
    number(i64), write_i64 => i8, i16, i32, i64, isize
}

#[inline]
const fn number_to_bytes(mut n: u64) -> ([u8; 20], usize) {
    let mut buffer = [b'0'; 20];
    let mut i = 20;

    if n == 0 {
        return (buffer, 19);
    }

    while n > 0 {
        i -= 1;
        buffer[i] = b'0' + (n % 10) as u8;
        n /= 10;
    }

    (buffer, i)
}

#[inline(always)]
fn write_u64(value: u64, buffer: &mut Vec<u8>) {
    let (arr, start) = number_to_bytes(value);
    buffer.extend_from_slice(&arr[start..]);
}

#[inline(always)]
fn write_i64(value: i64, buffer: &mut Vec<u8>) {
    if value < 0 {
        buffer.push(b'-');
    }
    write_u64(value.unsigned_abs(), buffer);
}

/// Serializes `value` and hands the bytes to `writer` in one call.
pub(crate) fn write_all<T, W>(value: &T, writer: &mut W) -> io::Result<usize>
where
    T: WriteBuffer + ?Sized,
    W: io::Write + ?Sized,
{
    let mut buffer = Vec::new();
    value.write_to(&mut buffer);
    writer.write_all(&buffer)?;
    Ok(buffer.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::*;

    fn written<T: WriteBuffer + ?Sized>(value: &T) -> String {
        let mut buffer = Vec::new();
        value.write_to(&mut buffer);
        str_op(&buffer).to_owned()
    }

    #[test]
    fn numbers() {
        assert_eq!(written(&0u8), "0");
        assert_eq!(written(&150u32), "150");
        assert_eq!(written(&u64::MAX), "18446744073709551615");
        assert_eq!(written(&-123i32), "-123");
        assert_eq!(written(&i64::MIN), "-9223372036854775808");
    }

    #[test]
    fn bytes() {
        assert_eq!(written("text"), "text");
        assert_eq!(written(&String::from("own")), "own");
        assert_eq!(written(b"raw".as_slice()), "raw");
        assert_eq!(written(b"arr"), "arr");
        assert_eq!(written(&Cow::Borrowed(b"cow".as_slice())), "cow");
    }

    #[test]
    fn io_writer() {
        let mut out = Vec::new();
        assert_eq!(write_all("abc", &mut out).unwrap(), 3);
        assert_eq!(out, b"abc");
    }
}
