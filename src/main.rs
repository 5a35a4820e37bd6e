fn main() -> anyhow::Result<()> {
    tour_milp::runner::run()
}
