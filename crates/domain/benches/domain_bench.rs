use common::EntityId;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use domain::{AddItem, Aggregate, Basket, BasketEvent, BasketService, CreateBasket};
use event_log::InMemoryLogStore;

fn basket_history(id: EntityId, items: usize) -> Vec<BasketEvent> {
    std::iter::once(BasketEvent::basket_created(id))
        .chain((0..items).map(|n| BasketEvent::item_added(id, format!("item-{n}"))))
        .collect()
}

fn bench_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("domain/fold");
    for items in [10, 100, 1000] {
        let events = basket_history(EntityId::new(), items);
        group.bench_with_input(BenchmarkId::from_parameter(items), &events, |b, events| {
            b.iter(|| Basket::fold(None, events).unwrap());
        });
    }
    group.finish();
}

fn bench_create_basket(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("domain/create_basket", |b| {
        b.iter(|| {
            rt.block_on(async {
                let service = BasketService::new(InMemoryLogStore::new());
                service
                    .create_basket(CreateBasket::with_new_id())
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_add_item_with_replay(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("domain/add_item");

    for history in [10, 100] {
        let service = BasketService::new(InMemoryLogStore::new());
        let id = EntityId::new();
        rt.block_on(async {
            service.create_basket(CreateBasket::new(id)).await.unwrap();
            for n in 0..history {
                service
                    .add_item(AddItem::new(id, format!("seed-{n}")))
                    .await
                    .unwrap();
            }
        });

        group.bench_function(BenchmarkId::from_parameter(history), |b| {
            b.iter(|| {
                rt.block_on(async {
                    service.add_item(AddItem::new(id, "bench")).await.unwrap();
                });
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_fold,
    bench_create_basket,
    bench_add_item_with_replay
);
criterion_main!(benches);
