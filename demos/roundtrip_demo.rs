use revcanvas::{decode, encode, pack, unpack, CanvasProfile};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let payload: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 256) as u8).collect();

    let canvas = encode(&payload, CanvasProfile::default())?;
    println!(
        "encoded {} bytes onto a {}x{} canvas ({} steps materialized)",
        payload.len(),
        canvas.width(),
        canvas.height(),
        canvas.occupied_steps()
    );

    let raw = pack(&canvas);
    println!("container: {} bytes on the wire", raw.len());

    let restored = decode(unpack(&raw)?)?;
    assert_eq!(restored, payload);
    println!("decode converged; payload restored bit-for-bit");

    Ok(())
}
