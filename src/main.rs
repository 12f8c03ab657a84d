fn main() -> anyhow::Result<()> {
    tmplc::run()
}
