use colorrun::{Color, runs};

fn main() -> std::io::Result<()> {
    // Write normally
    colorrun::write_line(&runs!["Hello world"])?;

    // Write text in red
    colorrun::write_line(&runs![("Hello World", Color::Red)])?;

    // Write Hello in red and world in blue with green background
    colorrun::write_line(&runs![
        ("Hello", Color::Red),
        " ",
        ("world", Color::Blue, Color::Green),
    ])?;
    Ok(())
}
